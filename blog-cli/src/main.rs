use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use blog_client::{
    BlogClient, BlogClientError, Category, ListPostsResponse, NewPost, Post, PostPatch, Profile,
    Role, TokenPair,
};
use clap::{Parser, Subcommand, ValueEnum};

const TOKEN_FILE: &str = ".blog_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "CLI клиент для blog-server")]
struct Cli {
    /// Адрес HTTP-сервера.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Обновление пары токенов по сохранённому refresh token.
    Refresh,
    /// Профиль текущего пользователя.
    Me,
    /// Смена роли пользователя (требует роль ADMIN).
    SetRole {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    /// Операции с категориями.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Создание поста (требует роль ADMIN).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        slug: Option<String>,
        /// Slug категории; можно указать несколько раз.
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Обновление поста (требует роль ADMIN и авторство).
    ///
    /// Меняются только переданные поля; `--category` заменяет весь набор категорий.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "category")]
        categories: Option<Vec<String>>,
    },
    /// Удаление поста (требует роль ADMIN и авторство).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Список постов.
    List {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// Список категорий.
    List,
    /// Категория по slug.
    Get {
        #[arg(long)]
        slug: String,
    },
    /// Создание категории (требует роль ADMIN).
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
    },
    /// Замена имени и slug категории (требует роль ADMIN).
    Update {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        new_slug: String,
    },
    /// Удаление категории (требует роль ADMIN).
    Delete {
        #[arg(long)]
        slug: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string()));
    let mut client = BlogClient::new(server).map_err(map_client_error)?;

    if let Some(tokens) = load_tokens().context("не удалось прочитать .blog_token")? {
        client.set_tokens(tokens);
    }

    match cli.command {
        Command::Register {
            email,
            password,
            full_name,
        } => {
            client
                .register(&email, &password, full_name.as_deref())
                .await
                .map_err(map_client_error)?;
            persist_tokens(&client).context("не удалось сохранить токен")?;
            println!("Регистрация успешна, токены сохранены в {TOKEN_FILE}");
        }
        Command::Login { email, password } => {
            client
                .login(&email, &password)
                .await
                .map_err(map_client_error)?;
            persist_tokens(&client).context("не удалось сохранить токен")?;
            println!("Вход выполнен, токены сохранены в {TOKEN_FILE}");
        }
        Command::Refresh => {
            client.refresh().await.map_err(map_client_error)?;
            persist_tokens(&client).context("не удалось сохранить токен")?;
            println!("Токены обновлены");
        }
        Command::Me => {
            let profile = client.me().await.map_err(map_client_error)?;
            print_profile(&profile);
        }
        Command::SetRole { email, role } => {
            client
                .set_role(&email, role.into())
                .await
                .map_err(map_client_error)?;
            println!("Роль изменена: {email} -> {role:?}");
        }
        Command::Category(command) => run_category(&client, command).await?,
        Command::Create {
            title,
            content,
            slug,
            categories,
        } => {
            let post = client
                .create_post(&NewPost {
                    title,
                    slug,
                    content,
                    categories,
                })
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        Command::Update {
            id,
            title,
            content,
            categories,
        } => {
            let patch = PostPatch {
                title,
                content,
                categories,
            };
            let post = client
                .patch_post(id, &patch)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::List { limit, offset } => {
            let list = client
                .list_posts(limit, offset)
                .await
                .map_err(map_client_error)?;
            print_list(&list);
        }
    }

    Ok(())
}

async fn run_category(client: &BlogClient, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::List => {
            let categories = client.list_categories().await.map_err(map_client_error)?;
            println!("Категорий: {}", categories.len());
            for category in &categories {
                println!("- {} ({})", category.slug, category.name);
            }
        }
        CategoryCommand::Get { slug } => {
            let category = client.get_category(&slug).await.map_err(map_client_error)?;
            print_category("Категория", &category);
        }
        CategoryCommand::Create { name, slug } => {
            let category = client
                .create_category(&name, &slug)
                .await
                .map_err(map_client_error)?;
            print_category("Категория создана", &category);
        }
        CategoryCommand::Update {
            slug,
            name,
            new_slug,
        } => {
            let category = client
                .update_category(&slug, &name, &new_slug)
                .await
                .map_err(map_client_error)?;
            print_category("Категория обновлена", &category);
        }
        CategoryCommand::Delete { slug } => {
            client
                .delete_category(&slug)
                .await
                .map_err(map_client_error)?;
            println!("Категория удалена: {slug}");
        }
    }
    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<TokenPair> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

fn load_tokens() -> io::Result<Option<TokenPair>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_tokens(client: &BlogClient) -> io::Result<()> {
    if let Some(tokens) = client.tokens() {
        let raw = serde_json::to_string(tokens).map_err(io::Error::other)?;
        fs::write(TOKEN_FILE, raw)?;
    }
    Ok(())
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    let message = match err {
        BlogClientError::Unauthorized(message) => format!(
            "требуется авторизация ({message}): выполните `blog-cli login ...` или `blog-cli refresh`"
        ),
        BlogClientError::Forbidden(message) => format!("недостаточно прав: {message}"),
        BlogClientError::NotFound(message) => format!("ресурс не найден: {message}"),
        BlogClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BlogClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_profile(profile: &Profile) {
    println!("id: {}", profile.id);
    println!("email: {}", profile.email);
    println!(
        "full_name: {}",
        profile.full_name.as_deref().unwrap_or("-")
    );
    println!("role: {:?}", profile.role);
}

fn print_category(title: &str, category: &Category) {
    println!("{title}");
    println!("slug: {}", category.slug);
    println!("name: {}", category.name);
}

fn print_post(title: &str, post: &Post) {
    let categories: Vec<&str> = post
        .categories
        .iter()
        .map(|category| category.slug.as_str())
        .collect();

    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("slug: {}", post.slug);
    println!("content: {}", post.content);
    println!("author: {} (id={})", post.author, post.author_id);
    println!("categories: {}", categories.join(", "));
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_list(list: &ListPostsResponse) {
    println!(
        "Постов: {} (limit={}, offset={}, total={})",
        list.posts.len(),
        list.limit,
        list.offset,
        list.total
    );

    for post in &list.posts {
        println!("- [{}] {} (author={})", post.id, post.title, post.author);
    }
}
