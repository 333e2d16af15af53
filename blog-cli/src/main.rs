use std::fs;
use std::path::Path;

use anyhow::Context;
use blog_client::{BlogClientHttp, PostInput};
use clap::{Parser, Subcommand};
use uuid::Uuid;

const TOKEN_FILE: &str = ".blog_token";

#[derive(Parser, Debug)]
#[command(name = "blog", about = "Command line client for the blog API")]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged in user
    Me,
    ListPosts {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
    },
    GetPost {
        id: Uuid,
    },
    CreatePost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<Uuid>,
    },
    UpdatePost {
        id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<Uuid>,
    },
    DeletePost {
        id: Uuid,
    },
    Search {
        keyword: String,
    },
    Comments {
        post_id: Uuid,
    },
    AddComment {
        post_id: Uuid,
        #[arg(long)]
        content: String,
    },
    DeleteComment {
        post_id: Uuid,
        comment_id: Uuid,
    },
    Categories,
    CategoryPosts {
        category_id: Uuid,
    },
    AuthorPosts {
        username: String,
    },
}

fn load_token() -> Option<String> {
    fs::read_to_string(TOKEN_FILE)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn save_token(token: &str) -> anyhow::Result<()> {
    fs::write(TOKEN_FILE, token).with_context(|| format!("failed to write {TOKEN_FILE}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut client = BlogClientHttp::connect(&args.server)?;
    if let Some(token) = load_token() {
        client.set_token(token);
    }

    match args.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client.register(&username, &email, &password).await?;
            save_token(&auth.access_token)?;
            println!("Registered as {} ({})", auth.username, auth.email);
        }
        Command::Login { username, password } => {
            let auth = client.login(&username, &password).await?;
            save_token(&auth.access_token)?;
            println!("Logged in as {}", auth.username);
        }
        Command::Logout => {
            if Path::new(TOKEN_FILE).exists() {
                fs::remove_file(TOKEN_FILE)
                    .with_context(|| format!("failed to remove {TOKEN_FILE}"))?;
            }
            println!("Logged out");
        }
        Command::Me => {
            let me = client.me().await?;
            println!("{} <{}> role={} id={}", me.username, me.email, me.role, me.id);
        }
        Command::ListPosts { page, size } => {
            let posts = client.list_posts(page, size).await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!("- [{}] {} (by {})", post.id, post.title, post.author.username);
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            println!("{post}");
        }
        Command::CreatePost {
            title,
            content,
            category,
        } => {
            let input = PostInput {
                title,
                content,
                category_id: category,
            };
            let post = client.create_post(&input).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::UpdatePost {
            id,
            title,
            content,
            category,
        } => {
            let input = PostInput {
                title,
                content,
                category_id: category,
            };
            let post = client.update_post(id, &input).await?;
            println!("Post updated: {post}");
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
        Command::Search { keyword } => {
            for post in client.search_posts(&keyword).await? {
                println!("- [{}] {} (by {})", post.id, post.title, post.author.username);
            }
        }
        Command::Comments { post_id } => {
            for comment in client.list_comments(post_id).await? {
                println!("{comment}");
            }
        }
        Command::AddComment { post_id, content } => {
            let comment = client.add_comment(post_id, &content).await?;
            println!("Comment added! ID: {}", comment.id);
        }
        Command::DeleteComment {
            post_id,
            comment_id,
        } => {
            client.delete_comment(post_id, comment_id).await?;
            println!("Comment deleted!");
        }
        Command::Categories => {
            for category in client.list_categories().await? {
                println!("- [{}] {}", category.id, category.name);
            }
        }
        Command::CategoryPosts { category_id } => {
            for post in client.posts_by_category(category_id).await? {
                println!("- [{}] {} (by {})", post.id, post.title, post.author.username);
            }
        }
        Command::AuthorPosts { username } => {
            for post in client.posts_by_author(&username).await? {
                println!("- [{}] {}", post.id, post.title);
            }
        }
    }

    Ok(())
}
