use serde_json::{Value, json};

use crate::common::{TestApp, routes};

async fn keyword(app: &TestApp, name: &str, token: &str) -> i32 {
    app.create("keywords", json!({ "name": name }), token).await
}

async fn category(app: &TestApp, name: &str, token: &str) -> i32 {
    app.create("categories", json!({"name": name, "icon": "folder"}), token)
        .await
}

fn template(title: &str, extra: Value) -> Value {
    let mut body = json!({
        "title": title,
        "description": "Plantilla lista para usar",
        "price": 149.9,
    });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            body.insert(k.clone(), v.clone());
        }
    }
    body
}

fn keyword_names(body: &Value) -> Vec<&str> {
    body["keywords"]
        .as_array()
        .expect("keywords should be an array")
        .iter()
        .map(|k| k["name"].as_str().unwrap())
        .collect()
}

mod create {
    use super::*;

    #[tokio::test]
    async fn template_carries_category_and_sorted_keywords() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let cat = category(&app, "Ventas", &token).await;
        let sql = keyword(&app, "sql", &token).await;
        let excel = keyword(&app, "excel", &token).await;

        let res = app
            .post_with_token(
                &routes::admin("templates"),
                &template(
                    "Dashboard de ventas",
                    json!({"category_id": cat, "keyword_ids": [sql, excel]}),
                ),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["category"]["name"], "Ventas");
        assert_eq!(keyword_names(&res.body), vec!["excel", "sql"]);
        assert_eq!(res.body["is_featured"], false);
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                &routes::admin("templates"),
                &template("Huérfana", json!({"category_id": 999})),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn unknown_keyword_is_not_found_and_nothing_is_stored() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                &routes::admin("templates"),
                &template("Fantasma", json!({"keyword_ids": [777]})),
                &token,
            )
            .await;
        assert_eq!(res.status, 404);

        let list = app.get_with_token(&routes::admin("templates"), &token).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn duplicate_keyword_ids_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let sql = keyword(&app, "sql", &token).await;

        let res = app
            .post_with_token(
                &routes::admin("templates"),
                &template("Doble", json!({"keyword_ids": [sql, sql]})),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn keyword_ids_replace_the_whole_set() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let sql = keyword(&app, "sql", &token).await;
        let excel = keyword(&app, "excel", &token).await;
        let python = keyword(&app, "python", &token).await;
        let id = app
            .create(
                "templates",
                template("Reporte", json!({"keyword_ids": [sql, excel]})),
                &token,
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_item("templates", id),
                &json!({"keyword_ids": [python]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(keyword_names(&res.body), vec!["python"]);
    }

    #[tokio::test]
    async fn omitted_keyword_ids_leave_keywords_alone() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let sql = keyword(&app, "sql", &token).await;
        let id = app
            .create("templates", template("Reporte", json!({"keyword_ids": [sql]})), &token)
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_item("templates", id),
                &json!({"title": "Reporte mensual"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Reporte mensual");
        assert_eq!(keyword_names(&res.body), vec!["sql"]);
    }

    #[tokio::test]
    async fn null_price_means_quote_on_request() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app
            .create("templates", template("Con precio", json!({})), &token)
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_item("templates", id),
                &json!({"price": null}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["price"].is_null());
    }
}

mod taxonomy {
    use super::*;

    #[tokio::test]
    async fn deleting_a_category_detaches_its_templates() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let cat = category(&app, "Finanzas", &token).await;
        let id = app
            .create("templates", template("Flujo de caja", json!({"category_id": cat})), &token)
            .await;

        let del = app
            .delete_with_token(&routes::admin_item("categories", cat), &token)
            .await;
        assert_eq!(del.status, 204);

        let res = app
            .get_with_token(&routes::admin_item("templates", id), &token)
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body["category_id"].is_null());
        assert!(res.body["category"].is_null());
    }

    #[tokio::test]
    async fn deleting_a_keyword_removes_it_from_templates() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let sql = keyword(&app, "sql", &token).await;
        let excel = keyword(&app, "excel", &token).await;
        let id = app
            .create(
                "templates",
                template("Reporte", json!({"keyword_ids": [sql, excel]})),
                &token,
            )
            .await;

        let del = app
            .delete_with_token(&routes::admin_item("keywords", sql), &token)
            .await;
        assert_eq!(del.status, 204);

        let res = app
            .get_with_token(&routes::admin_item("templates", id), &token)
            .await;
        assert_eq!(keyword_names(&res.body), vec!["excel"]);
    }

    #[tokio::test]
    async fn duplicate_keyword_name_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        keyword(&app, "sql", &token).await;

        let res = app
            .post_with_token(&routes::admin("keywords"), &json!({"name": "sql"}), &token)
            .await;

        assert_eq!(res.status, 409);
    }
}

mod public_listing {
    use super::*;

    #[tokio::test]
    async fn featured_filter_returns_only_featured() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let star = app
            .create("templates", template("Estrella", json!({"is_featured": true})), &token)
            .await;
        app.create("templates", template("Normal", json!({})), &token)
            .await;

        let res = app
            .get_without_token(&routes::site("templates?featured=true"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![star]);
    }

    #[tokio::test]
    async fn keyword_filter_matches_case_insensitively() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let sql = keyword(&app, "SQL", &token).await;
        let tagged = app
            .create("templates", template("Consultas", json!({"keyword_ids": [sql]})), &token)
            .await;
        app.create("templates", template("Sin etiqueta", json!({})), &token)
            .await;

        let res = app
            .get_without_token(&routes::site("templates?keyword=sql"))
            .await;

        assert_eq!(res.ids(), vec![tagged]);
    }

    #[tokio::test]
    async fn unknown_keyword_filter_returns_nothing() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create("templates", template("Algo", json!({})), &token)
            .await;

        let res = app
            .get_without_token(&routes::site("templates?keyword=cobol"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn category_filter_and_delete() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let cat = category(&app, "RRHH", &token).await;
        let inside = app
            .create("templates", template("Planilla", json!({"category_id": cat})), &token)
            .await;
        app.create("templates", template("Otra", json!({})), &token)
            .await;

        let res = app
            .get_without_token(&routes::site(&format!("templates?category_id={cat}")))
            .await;
        assert_eq!(res.ids(), vec![inside]);

        let del = app
            .delete_with_token(&routes::admin_item("templates", inside), &token)
            .await;
        assert_eq!(del.status, 204);

        let after = app
            .get_without_token(&routes::site(&format!("templates?category_id={cat}")))
            .await;
        assert_eq!(after.body, json!([]));
    }
}
