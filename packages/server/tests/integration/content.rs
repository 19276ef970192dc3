use serde_json::json;

use crate::common::{TestApp, routes};

fn slide(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "highlight": "con datos",
        "description": "Decisiones claras",
        "image_url": "https://cdn.example.com/hero.png",
    })
}

mod hero_slides {
    use super::*;

    #[tokio::test]
    async fn created_slides_appear_on_the_site_in_order() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let first = app.create("hero-slides", slide("Primero"), &token).await;
        let second = app.create("hero-slides", slide("Segundo"), &token).await;

        let res = app.get_without_token(&routes::site("hero-slides")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![first, second]);
        assert_eq!(res.body[0]["order_index"], 0);
        assert_eq!(res.body[1]["order_index"], 1);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(&routes::admin("hero-slides"), &slide("   "), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_rejects_non_http_image_link() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let mut body = slide("Hola");
        body["image_url"] = json!("javascript:alert(1)");

        let res = app
            .post_with_token(&routes::admin("hero-slides"), &body, &token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn drive_share_links_are_stored_as_direct_links() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let mut body = slide("Drive");
        body["image_url"] = json!("https://drive.google.com/file/d/1AbC-d_9/view?usp=sharing");

        let res = app
            .post_with_token(&routes::admin("hero-slides"), &body, &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(
            res.body["image_url"],
            "https://drive.google.com/uc?export=view&id=1AbC-d_9"
        );
    }

    #[tokio::test]
    async fn empty_patch_returns_the_row_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create("hero-slides", slide("Intacto"), &token).await;

        let res = app
            .patch_with_token(&routes::admin_item("hero-slides", id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Intacto");
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create("hero-slides", slide("Antes"), &token).await;

        let res = app
            .patch_with_token(
                &routes::admin_item("hero-slides", id),
                &json!({"title": "Después"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Después");
        assert_eq!(res.body["highlight"], "con datos");
    }

    #[tokio::test]
    async fn deleting_a_missing_slide_returns_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .delete_with_token(&routes::admin_item("hero-slides", 4242), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn deleted_slide_disappears() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create("hero-slides", slide("Temporal"), &token).await;

        let del = app
            .delete_with_token(&routes::admin_item("hero-slides", id), &token)
            .await;
        assert_eq!(del.status, 204);

        let res = app
            .get_with_token(&routes::admin_item("hero-slides", id), &token)
            .await;
        assert_eq!(res.status, 404);
    }
}

mod reorder {
    use super::*;

    #[tokio::test]
    async fn reorder_assigns_indexes_by_position() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let a = app.create("hero-slides", slide("A"), &token).await;
        let b = app.create("hero-slides", slide("B"), &token).await;
        let c = app.create("hero-slides", slide("C"), &token).await;

        let res = app
            .put_with_token(
                &routes::admin_reorder("hero-slides"),
                &json!({"ids": [c, a, b]}),
                &token,
            )
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let list = app.get_without_token(&routes::site("hero-slides")).await;
        assert_eq!(list.ids(), vec![c, a, b]);
    }

    #[tokio::test]
    async fn reorder_must_name_every_row() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let a = app.create("hero-slides", slide("A"), &token).await;
        app.create("hero-slides", slide("B"), &token).await;

        let res = app
            .put_with_token(
                &routes::admin_reorder("hero-slides"),
                &json!({"ids": [a]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn reorder_rejects_duplicates() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let a = app.create("hero-slides", slide("A"), &token).await;

        let res = app
            .put_with_token(
                &routes::admin_reorder("hero-slides"),
                &json!({"ids": [a, a]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }
}

mod services {
    use super::*;

    fn service(title: &str, home: bool) -> serde_json::Value {
        json!({
            "title": title,
            "description": "Tableros y reportes",
            "image_url": "https://cdn.example.com/bi.png",
            "icon": "chart-bar",
            "show_in_home": home,
        })
    }

    #[tokio::test]
    async fn home_filter_keeps_only_flagged_services() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let shown = app.create("services", service("Power BI", true), &token).await;
        app.create("services", service("Consultoría", false), &token)
            .await;

        let all = app.get_without_token(&routes::site("services")).await;
        assert_eq!(all.body.as_array().unwrap().len(), 2);

        let home = app
            .get_without_token(&routes::site("services?home=true"))
            .await;
        assert_eq!(home.status, 200);
        assert_eq!(home.ids(), vec![shown]);
    }
}

mod payment_methods {
    use super::*;

    #[tokio::test]
    async fn inactive_methods_are_hidden_from_the_site() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let active = app
            .create(
                "payment-methods",
                json!({
                    "name": "Transferencia",
                    "description": "Banco Nacional",
                    "account_info": "CR00 0000 0000",
                    "icon": "bank",
                }),
                &token,
            )
            .await;
        let hidden = app
            .create(
                "payment-methods",
                json!({
                    "name": "SINPE",
                    "description": "Pago móvil",
                    "account_info": "8888-8888",
                    "icon": "phone",
                    "is_active": false,
                }),
                &token,
            )
            .await;

        let site = app.get_without_token(&routes::site("payment-methods")).await;
        assert_eq!(site.ids(), vec![active]);

        let admin = app
            .get_with_token(&routes::admin("payment-methods"), &token)
            .await;
        assert_eq!(admin.ids(), vec![active, hidden]);
    }
}

mod testimonials {
    use super::*;

    #[tokio::test]
    async fn rating_defaults_to_five() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                &routes::admin("testimonials"),
                &json!({"name": "Lucía", "content": "Excelente servicio"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["rating"], 5);
    }

    #[tokio::test]
    async fn rating_outside_one_to_five_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        for rating in [0, 6] {
            let res = app
                .post_with_token(
                    &routes::admin("testimonials"),
                    &json!({"name": "Lucía", "content": "Bien", "rating": rating}),
                    &token,
                )
                .await;
            assert_eq!(res.status, 400, "rating {rating} accepted");
        }
    }

    #[tokio::test]
    async fn image_can_be_cleared_with_null() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app
            .create(
                "testimonials",
                json!({
                    "name": "Lucía",
                    "content": "Bien",
                    "image_url": "https://cdn.example.com/lucia.jpg",
                }),
                &token,
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_item("testimonials", id),
                &json!({"image_url": null}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["image_url"].is_null());
    }
}

mod about {
    use super::*;

    #[tokio::test]
    async fn missing_about_page_is_not_found_until_written() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let before = app.get_without_token(&routes::site("about")).await;
        assert_eq!(before.status, 404);

        let body = json!({
            "mission": "Democratizar los datos",
            "vision": "Ser referentes en la región",
            "history": "Fundada en 2019",
        });
        let put = app.put_with_token(&routes::admin("about"), &body, &token).await;
        assert_eq!(put.status, 200, "{}", put.text);

        let after = app.get_without_token(&routes::site("about")).await;
        assert_eq!(after.status, 200);
        assert_eq!(after.body["mission"], "Democratizar los datos");
    }

    #[tokio::test]
    async fn second_write_replaces_the_first() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        for mission in ["Primera", "Segunda"] {
            let body = json!({"mission": mission, "vision": "v", "history": "h"});
            let res = app.put_with_token(&routes::admin("about"), &body, &token).await;
            assert_eq!(res.status, 200);
        }

        let res = app.get_with_token(&routes::admin("about"), &token).await;
        assert_eq!(res.body["mission"], "Segunda");
    }
}

mod bi {
    use super::*;

    #[tokio::test]
    async fn page_starts_empty() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::site("bi")).await;

        assert_eq!(res.status, 200);
        assert!(res.body["hero"].is_null());
        assert!(res.body["video"].is_null());
        assert_eq!(res.body["features"], json!([]));
        assert_eq!(res.body["faqs"], json!([]));
    }

    #[tokio::test]
    async fn page_collects_hero_features_video_and_faqs() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let hero = app
            .put_with_token(
                &routes::admin("bi/hero"),
                &json!({
                    "title": "Inteligencia de negocios",
                    "description": "Del dato a la decisión",
                    "image_url": "https://cdn.example.com/bi-hero.png",
                }),
                &token,
            )
            .await;
        assert_eq!(hero.status, 200, "{}", hero.text);

        let video = app
            .put_with_token(
                &routes::admin("bi/video"),
                &json!({
                    "video_url": "https://www.youtube.com/embed/abc123",
                    "title": "Demo",
                    "description": "Recorrido",
                }),
                &token,
            )
            .await;
        assert_eq!(video.status, 200, "{}", video.text);

        app.create(
            "bi/features",
            json!({
                "category": "Big data",
                "title": "Lagos de datos",
                "description": "Almacenamiento escalable",
                "image_url": "https://cdn.example.com/lake.png",
            }),
            &token,
        )
        .await;
        app.create(
            "bi/faqs",
            json!({"question": "¿Qué herramientas usan?", "answer": "Power BI"}),
            &token,
        )
        .await;

        let res = app.get_without_token(&routes::site("bi")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["hero"]["title"], "Inteligencia de negocios");
        assert_eq!(res.body["video"]["title"], "Demo");
        assert_eq!(res.body["features"][0]["category"], "Big data");
        assert_eq!(res.body["faqs"][0]["answer"], "Power BI");
    }

    #[tokio::test]
    async fn unknown_feature_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                &routes::admin("bi/features"),
                &json!({
                    "category": "Machine learning",
                    "title": "Modelos",
                    "description": "Predicción",
                    "image_url": "https://cdn.example.com/ml.png",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn faqs_can_be_reordered() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let a = app
            .create("bi/faqs", json!({"question": "¿A?", "answer": "a"}), &token)
            .await;
        let b = app
            .create("bi/faqs", json!({"question": "¿B?", "answer": "b"}), &token)
            .await;

        let res = app
            .put_with_token(
                &routes::admin_reorder("bi/faqs"),
                &json!({"ids": [b, a]}),
                &token,
            )
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let list = app.get_with_token(&routes::admin("bi/faqs"), &token).await;
        assert_eq!(list.ids(), vec![b, a]);
    }
}

mod optional_images {
    use super::*;

    #[tokio::test]
    async fn slide_service_and_client_can_be_created_without_an_image() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let slide = app
            .post_with_token(
                &routes::admin("hero-slides"),
                &json!({
                    "title": "Sin imagen",
                    "highlight": "por ahora",
                    "description": "Se completará luego",
                }),
                &token,
            )
            .await;
        assert_eq!(slide.status, 201, "{}", slide.text);
        assert!(slide.body["image_url"].is_null());

        let service = app
            .post_with_token(
                &routes::admin("services"),
                &json!({
                    "title": "Automatización",
                    "description": "Procesos",
                    "icon": "Cog",
                    "image_url": "",
                }),
                &token,
            )
            .await;
        assert_eq!(service.status, 201, "{}", service.text);
        assert!(service.body["image_url"].is_null());

        let client = app
            .post_with_token(
                &routes::admin("clients"),
                &json!({"name": "Minera Andina"}),
                &token,
            )
            .await;
        assert_eq!(client.status, 201, "{}", client.text);
        assert!(client.body["logo_url"].is_null());
    }

    #[tokio::test]
    async fn image_can_be_removed_from_a_service() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app
            .create(
                "services",
                json!({
                    "title": "BI",
                    "description": "Tableros",
                    "icon": "chart-bar",
                    "image_url": "https://cdn.example.com/bi.png",
                }),
                &token,
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_item("services", id),
                &json!({"image_url": null}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["image_url"].is_null());
    }
}
