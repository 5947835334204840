//! Bot API client against a mock HTTP server.

use serde_json::json;
use warden_core::{ChannelId, MemberStatus, UserId};
use warden_error::PlatformErrorKind;
use warden_guard::{MembershipApi, Notifier};
use warden_telegram::TelegramClient;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:TEST";
const CHANNEL: ChannelId = ChannelId(-100123);

fn client(server: &MockServer) -> TelegramClient {
    TelegramClient::new(&server.uri(), TOKEN, 600)
}

fn api_path(method_name: &str) -> String {
    format!("/bot{}/{}", TOKEN, method_name)
}

#[tokio::test]
async fn test_demote_clears_every_right() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("promoteChatMember")))
        .and(body_partial_json(json!({
            "chat_id": -100123,
            "user_id": 555,
            "can_manage_chat": false,
            "can_delete_messages": false,
            "can_manage_video_chats": false,
            "can_restrict_members": false,
            "can_promote_members": false,
            "can_change_info": false,
            "can_invite_users": false,
            "can_pin_messages": false,
            "can_post_messages": false,
            "can_edit_messages": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .demote(CHANNEL, UserId(555))
        .await
        .expect("demotion succeeds");
}

#[tokio::test]
async fn test_member_status_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("getChatMember")))
        .and(body_partial_json(json!({"chat_id": -100123, "user_id": 777})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {
                "status": "administrator",
                "user": {"id": 777, "is_bot": false, "first_name": "Alice"},
                "can_restrict_members": true
            }
        })))
        .mount(&server)
        .await;

    let status = client(&server)
        .get_member_status(CHANNEL, UserId(777))
        .await
        .expect("lookup succeeds");
    assert_eq!(status, MemberStatus::Administrator);
}

#[tokio::test]
async fn test_rights_error_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("banChatMember")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: not enough rights to restrict/unrestrict chat member"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .ban(CHANNEL, UserId(555))
        .await
        .expect_err("ban refused");
    assert!(matches!(err.kind(), PlatformErrorKind::InsufficientRights(_)));
}

#[tokio::test]
async fn test_flood_control_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 12",
            "parameters": {"retry_after": 12}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .send(CHANNEL, "hello")
        .await
        .expect_err("flood control");
    assert_eq!(err.kind(), &PlatformErrorKind::RateLimited { retry_after: 12 });
    assert!(err.kind().is_transient());
}

#[tokio::test]
async fn test_rejected_token_and_garbage_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("getMe")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.get_me().await.expect_err("token rejected");
    assert_eq!(err.kind(), &PlatformErrorKind::Unauthorized);

    let err = client.send(CHANNEL, "hi").await.expect_err("bad body");
    assert!(matches!(err.kind(), PlatformErrorKind::InvalidResponse(_)));
}

#[tokio::test]
async fn test_send_message_posts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .and(body_partial_json(json!({"chat_id": -100123, "text": "alert"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {
                "message_id": 1,
                "chat": {"id": -100123, "type": "channel"},
                "date": 1700000000,
                "text": "alert"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send(CHANNEL, "alert")
        .await
        .expect("message delivered");
}
