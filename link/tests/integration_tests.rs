//! End-to-end tests against a running Kassie server.
//!
//! These need a server on KASSIE_TEST_URL (default http://127.0.0.1:8080)
//! with a profile named "local" pointing at a reachable cluster, so they are
//! ignored by default:
//!
//! ```sh
//! cargo test -p kassie-link -- --ignored
//! ```

use kassie_link::KassieClient;

fn test_url() -> String {
    std::env::var("KASSIE_TEST_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

fn client() -> KassieClient {
    KassieClient::builder().base_url(test_url()).build().unwrap()
}

#[tokio::test]
#[ignore = "requires a running Kassie server and cluster"]
async fn test_login_list_logout() {
    let client = client();

    let login = client.login("local").await.expect("login failed");
    assert!(!login.access_token.is_empty());
    assert!(!login.refresh_token.is_empty());
    assert_eq!(login.profile.name, "local");

    let keyspaces = client.keyspaces().await.expect("list keyspaces failed");
    assert!(keyspaces.keyspaces.iter().any(|ks| ks.name == "system"));

    client.logout().await.expect("logout failed");

    // The old token is dead: authenticated calls now fail.
    assert!(client.keyspaces().await.is_err());
}

#[tokio::test]
#[ignore = "requires a running Kassie server and cluster"]
async fn test_cursor_rotation() {
    let client = client();
    client.login("local").await.expect("login failed");

    let first = client
        .query_rows("system_schema", "columns", 2)
        .await
        .expect("query failed");

    if first.has_more {
        let c1 = first.cursor_id.clone();
        let second = client.next_page(&c1).await.expect("next page failed");
        if second.has_more {
            assert_ne!(second.cursor_id, c1, "cursor id must rotate per page");
        }
        // The consumed cursor is gone.
        assert!(client.next_page(&c1).await.is_err());
    }

    client.logout().await.ok();
}

#[tokio::test]
#[ignore = "requires a running Kassie server"]
async fn test_profiles_without_login() {
    let client = client();
    let profiles = client.profiles().await.expect("profiles failed");
    assert!(!profiles.profiles.is_empty());
}
