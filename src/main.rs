use std::sync::Arc;

use ::anyhow::{Context, Result};

use socialapp_client::api_methods::ApiMethods;
use socialapp_client::app::App;
use socialapp_client::config::Config;
use socialapp_client::health::{self, HealthMonitor, HealthStatus};
use socialapp_client::model::Post;
use socialapp_client::notifier::terminal::Terminal;
use socialapp_client::storage;

const HELP: &str = "\
Commands:
  feed                  show the feed
  open <id>             show a post with its comments
  back                  leave the post view
  post <text>           create a post
  edit <id> <text>      replace one of your posts
  delete <id>           delete one of your posts
  like <id>             like a post
  unlike <id>           remove your like
  toggle <id>           like or unlike
  comment <text>        comment on the open post
  search [query]        filter the feed, empty query clears it
  status                backend connection status
  logout                forget your name
  quit                  exit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Feed,
    Open(String),
    Back,
    Post(String),
    Edit(String, String),
    Delete(String),
    Like(String),
    Unlike(String),
    Toggle(String),
    Comment(String),
    Search(String),
    Status,
    Logout,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let require = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("usage: {} {}", verb, what))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "feed" | "home" => Command::Feed,
        "open" => Command::Open(require("<id>")?),
        "back" => Command::Back,
        "post" => Command::Post(require("<text>")?),
        "edit" => {
            let args = require("<id> <text>")?;
            match args.split_once(char::is_whitespace) {
                Some((id, text)) if !text.trim().is_empty() => {
                    Command::Edit(id.to_string(), text.trim().to_string())
                }
                _ => return Err("usage: edit <id> <text>".to_string()),
            }
        }
        "delete" => Command::Delete(require("<id>")?),
        "like" => Command::Like(require("<id>")?),
        "unlike" => Command::Unlike(require("<id>")?),
        "toggle" => Command::Toggle(require("<id>")?),
        "comment" => Command::Comment(require("<text>")?),
        "search" => Command::Search(rest.to_string()),
        "status" => Command::Status,
        "logout" => Command::Logout,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {} (try help)", other)),
    };

    Ok(Some(command))
}

fn render_post_line(app: &App, post: &Post) {
    let marker = if app.is_liked(&post.id) { "♥" } else { " " };
    let owner = if app.can_modify(post) { " [yours]" } else { "" };
    println!(
        "{} [{}] @{} · {}{}",
        marker,
        post.id,
        post.username,
        post.created_at.format("%Y-%m-%d"),
        owner
    );
    println!("    {}", post.content);
    println!("    ❤️ {}  💬 {}", post.likes_count, post.comments_count);
}

fn render_feed(app: &App) {
    let posts = app.visible_posts();

    println!("== Home Feed ==");
    if !app.search_query().is_empty() {
        println!("(search: {})", app.search_query());
    }
    if posts.is_empty() {
        println!("No posts yet. Be the first to create one!");
    }
    for post in posts {
        render_post_line(app, post);
    }

    println!("-- Recent Posts --");
    for (post, preview) in app.preview_posts() {
        println!("  @{}: {}", post.username, preview);
    }
}

fn render_detail(app: &App) {
    let Some(detail) = app.detail() else {
        render_feed(app);
        return;
    };
    let post = &detail.post;

    println!("== Post {} ==", post.id);
    println!(
        "@{} · {}",
        post.username,
        post.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", post.content);
    println!(
        "{} ({})  💬 {} comments",
        if detail.liked { "❤️ Liked" } else { "🤍 Like" },
        post.likes_count,
        post.comments_count
    );

    println!("-- Comments ({}) --", post.comments_count);
    if detail.comments.is_empty() {
        println!("No comments yet. Be the first to comment!");
    }
    for comment in &detail.comments {
        println!(
            "  @{} · {}: {}",
            comment.username,
            comment.created_at.format("%Y-%m-%d"),
            comment.content
        );
    }
}

fn render(app: &App) {
    if app.detail().is_some() {
        render_detail(app);
    } else {
        render_feed(app);
    }
}

/// Asks for a display name until one is given. Returns false on end of input.
async fn prompt_for_name(app: &mut App, terminal: &Terminal) -> bool {
    while app.needs_name_prompt() {
        println!("Welcome to SocialMedia! Please enter your username to continue.");
        match terminal.next_line("Username: ").await {
            Some(name) => {
                app.enter_name(name.trim());
            }
            None => return false,
        }
    }
    true
}

fn owned_post(app: &App, post_id: &str) -> bool {
    let post = match app.detail() {
        Some(detail) if detail.shows(post_id) => Some(&detail.post),
        _ => app.feed().get(post_id),
    };

    match post {
        Some(post) if app.can_modify(post) => true,
        Some(_) => {
            println!("You can only change your own posts.");
            false
        }
        None => {
            println!("No post with id {}", post_id);
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    let api = ApiMethods::new(&config.api_base_url)
        .context("invalid SOCIALAPP_API_BASE_URL")?;
    let terminal = Arc::new(Terminal::new());

    let monitor = HealthMonitor::spawn(api.clone(), health::DEFAULT_INTERVAL);

    let mut app = App::new(api, storage::make_storage(&config), terminal.clone());

    println!("Loading...");
    app.launch().await;

    if !prompt_for_name(&mut app, &terminal).await {
        return Ok(());
    }
    render(&app);

    loop {
        let prompt = format!("@{}> ", app.username().unwrap_or_default());
        let Some(line) = terminal.next_line(&prompt).await else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Help => println!("{}", HELP),
            Command::Feed => {
                app.back();
                app.refresh_feed().await;
                render(&app);
            }
            Command::Open(id) => {
                if app.select_post(&id).await {
                    render(&app);
                }
            }
            Command::Back => {
                app.back();
                render(&app);
            }
            Command::Post(text) => {
                if app.create_post(&text).await.is_some() {
                    render(&app);
                }
            }
            Command::Edit(id, text) => {
                if owned_post(&app, &id) && app.edit_post(&id, &text).await.is_some() {
                    render(&app);
                }
            }
            Command::Delete(id) => {
                if owned_post(&app, &id) && app.delete_post(&id).await {
                    render(&app);
                }
            }
            Command::Like(id) => {
                app.like(&id).await;
                render(&app);
            }
            Command::Unlike(id) => {
                app.unlike(&id).await;
                render(&app);
            }
            Command::Toggle(id) => {
                app.toggle_like(&id).await;
                render(&app);
            }
            Command::Comment(text) => {
                let Some(post_id) = app.detail().map(|d| d.post.id.clone()) else {
                    println!("Open a post first.");
                    continue;
                };
                if app.add_comment(&post_id, &text).await.is_some() {
                    render(&app);
                }
            }
            Command::Search(query) => {
                app.set_search_query(&query);
                render_feed(&app);
            }
            Command::Status => {
                let report = monitor.current();
                println!("{}", report.banner(app.api().base_url()));
                if report.status == HealthStatus::Offline {
                    ::log::warn!("backend at {} is offline", app.api().base_url());
                }
            }
            Command::Logout => {
                app.logout();
                if !prompt_for_name(&mut app, &terminal).await {
                    break;
                }
                render(&app);
            }
            Command::Quit => break,
        }
    }

    Ok(())
}
