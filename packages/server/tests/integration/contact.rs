use serde_json::json;

use crate::common::{RecordingMailer, TestApp, routes};

fn message() -> serde_json::Value {
    json!({
        "name": "Carla Díaz",
        "email": "carla@example.com",
        "company": "Acme",
        "message": "Quisiera una cotización de tableros.",
    })
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn message_is_stored_and_mailed() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::CONTACT, &message()).await;

        assert_eq!(res.status, 202, "{}", res.text);
        assert_eq!(res.body["delivered"], true);
        assert_eq!(app.mailer.sent_count(), 1);

        let sent = app.mailer.sent.lock().unwrap()[0].clone();
        assert!(sent.text.contains("carla@example.com"));
    }

    #[tokio::test]
    async fn mail_failure_still_keeps_the_message() {
        let app = TestApp::spawn_with(RecordingMailer::failing(), |_| {}).await;
        let token = app.admin_token().await;

        let res = app.post_without_token(routes::CONTACT, &message()).await;

        assert_eq!(res.status, 202);
        assert_eq!(res.body["delivered"], false);

        let list = app.get_with_token(routes::MESSAGES, &token).await;
        assert_eq!(list.body["pagination"]["total"], 1);
        assert_eq!(list.body["data"][0]["delivered"], false);
        assert_eq!(list.body["data"][0]["name"], "Carla Díaz");
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_before_sending() {
        let app = TestApp::spawn().await;
        let mut body = message();
        body["email"] = json!("carla-at-example");

        let res = app.post_without_token(routes::CONTACT, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let app = TestApp::spawn().await;
        let mut body = message();
        body["message"] = json!("  ");

        let res = app.post_without_token(routes::CONTACT, &body).await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn company_is_optional() {
        let app = TestApp::spawn().await;
        let mut body = message();
        body.as_object_mut().unwrap().remove("company");

        let res = app.post_without_token(routes::CONTACT, &body).await;

        assert_eq!(res.status, 202, "{}", res.text);
    }
}

mod inbox {
    use super::*;

    #[tokio::test]
    async fn editor_cannot_read_messages() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("editor", "securepass", "editor")
            .await;

        let res = app.get_with_token(routes::MESSAGES, &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn admin_reads_newest_first_and_deletes() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let first = app.post_without_token(routes::CONTACT, &message()).await;
        let mut later = message();
        later["name"] = json!("Luis");
        let second = app.post_without_token(routes::CONTACT, &later).await;

        let list = app.get_with_token(routes::MESSAGES, &token).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body["data"][0]["id"], second.body["id"]);
        assert_eq!(list.body["data"][1]["id"], first.body["id"]);

        let id = first.id();
        let del = app
            .delete_with_token(&format!("{}/{id}", routes::MESSAGES), &token)
            .await;
        assert_eq!(del.status, 204);

        let again = app
            .delete_with_token(&format!("{}/{id}", routes::MESSAGES), &token)
            .await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_rather_than_an_error() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.post_without_token(routes::CONTACT, &message()).await;

        let res = app
            .get_with_token(
                &format!("{}?page={}&per_page=100", routes::MESSAGES, u64::MAX),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);
    }
}
