use anyhow::{anyhow, ensure, Result};
use sns_common::{optional_env_var, required_env_var};
use sns_sdk::{ApiClient, ListQuery, Session};

const DEFAULT_API_URL: &str = "http://localhost:5000";

fn client_for(base_url: &str, username_var: &str, token_var: &str, http: &reqwest::Client) -> Result<ApiClient> {
    let session = Session::new(required_env_var(username_var)?, required_env_var(token_var)?);
    Ok(ApiClient::new(base_url, http.clone()).with_session(session))
}

/// Alice posts, Bob likes and unlikes, Alice's list shows the post with no likes.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let base_url = optional_env_var("SNS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let http = reqwest::Client::new();
    let alice = client_for(&base_url, "SNS_ALICE_USERNAME", "SNS_ALICE_TOKEN", &http)?;
    let bob = client_for(&base_url, "SNS_BOB_USERNAME", "SNS_BOB_TOKEN", &http)?;

    let post = alice.create_post_with("hello world", |post| {
        println!("alice posted #{}: {}", post.id, post.content);
    }).await?;

    let liked = bob.like(post.id).await?;
    println!("bob liked #{}: likeCount={} isLiked={}", post.id, liked.like_count, liked.is_liked);
    ensure!(liked.like_count == 1 && liked.is_liked, "unexpected like result {:?}", liked);

    match bob.like(post.id).await {
        Err(e) if e.status() == Some(422) => println!("second like rejected: {}", e),
        other => return Err(anyhow!("second like should be rejected, got {:?}", other)),
    }

    let unliked = bob.unlike(post.id).await?;
    println!("bob unliked #{}: likeCount={}", post.id, unliked.like_count);
    ensure!(unliked.like_count == 0 && !unliked.is_liked, "unexpected unlike result {:?}", unliked);

    let username = alice.session().map(|s| s.username.clone()).unwrap_or_default();
    let posts = alice.list_owner_posts(&username, ListQuery::default()).await?;
    let listed = posts.iter()
        .find(|p| p.id == post.id)
        .ok_or_else(|| anyhow!("post #{} missing from {}'s list", post.id, username))?;
    ensure!(listed.content == "hello world" && listed.like_count == 0, "unexpected listing {:?}", listed);
    println!("alice's list shows #{} with likeCount={}", listed.id, listed.like_count);

    alice.delete_post(post.id).await?;
    println!("Walkthrough finished");
    Ok(())
}
