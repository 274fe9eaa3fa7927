use std::time::{SystemTime, UNIX_EPOCH};

use blog_client::{BlogClient, BlogClientError, NewPost, PostPatch, Role};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

fn base_url() -> String {
    std::env::var("BLOG_HTTP_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

#[tokio::test]
#[ignore = "requires running HTTP server and database"]
async fn http_user_flow() {
    let mut client = BlogClient::new(base_url()).expect("client must build");

    let suffix = unique_suffix();
    let email = format!("http_{suffix}@example.com");
    let password = "password123";

    let registered = client
        .register(&email, password, Some("Smoke User"))
        .await
        .expect("register must succeed");
    assert_ne!(registered.access_token, registered.refresh_token);

    let duplicate = client.register(&email, password, None).await;
    assert!(matches!(duplicate, Err(BlogClientError::InvalidRequest(_))));

    let wrong_password = client.login(&email, "wrong-password").await;
    assert!(matches!(wrong_password, Err(BlogClientError::Unauthorized(_))));

    client
        .login(&email, password)
        .await
        .expect("login must succeed");

    let me = client.me().await.expect("me must succeed");
    assert_eq!(me.email, email);
    assert_eq!(me.role, Role::User);

    let refreshed = client.refresh().await.expect("refresh must succeed");
    assert!(!refreshed.access_token.is_empty());

    let forbidden = client
        .create_post(&NewPost {
            title: "not allowed".to_string(),
            content: "nope".to_string(),
            ..NewPost::default()
        })
        .await;
    assert!(matches!(forbidden, Err(BlogClientError::Forbidden(_))));
}

/// Needs `BLOG_ADMIN_EMAIL`/`BLOG_ADMIN_PASSWORD` of a user promoted via
/// `BOOTSTRAP_ADMIN_EMAIL`.
#[tokio::test]
#[ignore = "requires running HTTP server, database and a bootstrap admin"]
async fn http_admin_content_flow() {
    let admin_email = std::env::var("BLOG_ADMIN_EMAIL").expect("BLOG_ADMIN_EMAIL must be set");
    let admin_password =
        std::env::var("BLOG_ADMIN_PASSWORD").expect("BLOG_ADMIN_PASSWORD must be set");
    let mut client = BlogClient::new(base_url()).expect("client must build");
    client
        .login(&admin_email, &admin_password)
        .await
        .expect("admin login must succeed");

    let suffix = unique_suffix();
    let category_slug = format!("smoke_{suffix}");
    let category = client
        .create_category("Smoke", &category_slug)
        .await
        .expect("create_category must succeed");
    assert_eq!(category.slug, category_slug);

    let created = client
        .create_post(&NewPost {
            title: format!("Smoke post {suffix}"),
            slug: None,
            content: "<p>hello</p><script>alert(1)</script>".to_string(),
            categories: vec![category_slug.clone()],
        })
        .await
        .expect("create_post must succeed");
    assert_eq!(created.content, "<p>hello</p>");
    assert_eq!(created.author, admin_email);

    let unknown_category = client
        .create_post(&NewPost {
            title: format!("Orphan {suffix}"),
            content: "body".to_string(),
            categories: vec![format!("missing_{suffix}")],
            ..NewPost::default()
        })
        .await;
    assert!(matches!(unknown_category, Err(BlogClientError::NotFound(_))));

    let patched = client
        .patch_post(
            created.id,
            &PostPatch {
                title: Some("patched".to_string()),
                ..PostPatch::default()
            },
        )
        .await
        .expect("patch_post must succeed");
    assert_eq!(patched.title, "patched");
    assert_eq!(patched.content, created.content);

    let listed = client
        .list_posts(100, 0)
        .await
        .expect("list_posts must succeed");
    assert!(listed.total >= 1);

    client
        .delete_post(created.id)
        .await
        .expect("delete_post must succeed");
    let after_delete = client.get_post(created.id).await;
    assert!(matches!(after_delete, Err(BlogClientError::NotFound(_))));

    client
        .delete_category(&category_slug)
        .await
        .expect("delete_category must succeed");
}
