use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use serde_json::json;

use crate::common::{PUBLIC_BASE_URL, RecordingMailer, TestApp, TestResponse, routes};

/// Encode a `width` x `height` PNG. `seed` varies the pixels so distinct
/// seeds give distinct files; noisy pixels keep the file from compressing away.
fn png(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let img = RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

fn key_of(res: &TestResponse) -> String {
    res.body["key"]
        .as_str()
        .expect("upload response should contain 'key'")
        .to_string()
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn png_upload_returns_public_url_and_dimensions() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token("logo.png", "image/png", png(12, 8, 1), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let key = key_of(&res);
        assert_eq!(res.body["url"], format!("{PUBLIC_BASE_URL}/media/{key}"));
        assert_eq!(res.body["content_type"], "image/png");
        assert_eq!(res.body["width"], 12);
        assert_eq!(res.body["height"], 8);
        assert_eq!(res.body["filename"], "logo.png");
    }

    #[tokio::test]
    async fn identical_bytes_share_one_key() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let bytes = png(10, 10, 7);

        let first = app
            .upload_with_token("a.png", "image/png", bytes.clone(), &token)
            .await;
        let second = app
            .upload_with_token("b.png", "image/png", bytes, &token)
            .await;

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 201);
        assert_eq!(key_of(&first), key_of(&second));

        let list = app.get_with_token(routes::MEDIA, &token).await;
        assert_eq!(list.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn octet_stream_is_sniffed() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token("blob", "application/octet-stream", png(4, 4, 2), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["content_type"], "image/png");
    }

    #[tokio::test]
    async fn text_file_is_unsupported() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token("notes.txt", "text/plain", b"hola".to_vec(), &token)
            .await;

        assert_eq!(res.status, 415);
        assert_eq!(res.body["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn oversize_dimensions_are_rejected() {
        let app = TestApp::spawn_with(RecordingMailer::default(), |cfg| {
            cfg.storage.max_image_dimension = 16;
        })
        .await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token("wide.png", "image/png", png(32, 4, 3), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn oversize_file_is_rejected() {
        let app = TestApp::spawn_with(RecordingMailer::default(), |cfg| {
            cfg.storage.max_image_size = 1024;
        })
        .await;
        let token = app.admin_token().await;
        let bytes = png(48, 48, 4);
        assert!(bytes.len() > 1024);

        let res = app
            .upload_with_token("big.png", "image/png", bytes, &token)
            .await;

        assert_eq!(res.status, 413);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn editor_may_upload_but_viewer_may_not() {
        let app = TestApp::spawn().await;
        let editor = app
            .create_user_with_role("editor", "securepass", "editor")
            .await;
        let viewer = app.create_authenticated_user("viewer", "securepass").await;

        let ok = app
            .upload_with_token("e.png", "image/png", png(4, 4, 5), &editor)
            .await;
        assert_eq!(ok.status, 201, "{}", ok.text);

        let denied = app
            .upload_with_token("v.png", "image/png", png(4, 4, 6), &viewer)
            .await;
        assert_eq!(denied.status, 403);
    }
}

mod serving {
    use super::*;

    #[tokio::test]
    async fn stored_image_is_served_with_cache_headers() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let bytes = png(6, 6, 8);
        let up = app
            .upload_with_token("c.png", "image/png", bytes.clone(), &token)
            .await;
        let path = format!("/media/{}", key_of(&up));

        let res = app
            .client
            .get(app.url(&path))
            .send()
            .await
            .expect("Failed to fetch image");

        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "image/png");
        assert_eq!(
            res.headers()["cache-control"],
            "public, max-age=31536000, immutable"
        );
        let etag = res.headers()["etag"].clone();
        assert_eq!(res.bytes().await.unwrap().as_ref(), bytes.as_slice());

        let cached = app
            .client
            .get(app.url(&path))
            .header("If-None-Match", etag)
            .send()
            .await
            .expect("Failed to fetch image");
        assert_eq!(cached.status(), 304);
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token("/media/does-not-exist.png").await;

        assert_eq!(res.status, 404);
    }
}

mod management {
    use super::*;

    #[tokio::test]
    async fn delete_by_key_removes_row_and_bytes() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let up = app
            .upload_with_token("d.png", "image/png", png(4, 4, 9), &token)
            .await;
        let key = key_of(&up);

        let del = app
            .delete_with_token(&format!("{}/{key}", routes::MEDIA), &token)
            .await;
        assert_eq!(del.status, 204);

        let served = app.get_without_token(&format!("/media/{key}")).await;
        assert_eq!(served.status, 404);

        let again = app
            .delete_with_token(&format!("{}/{key}", routes::MEDIA), &token)
            .await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn deleted_image_is_not_found_even_with_cached_etag() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let up = app
            .upload_with_token("gone.png", "image/png", png(4, 4, 11), &token)
            .await;
        let key = key_of(&up);
        let path = format!("/media/{key}");

        let first = app
            .client
            .get(app.url(&path))
            .send()
            .await
            .expect("Failed to fetch image");
        let etag = first.headers()["etag"].clone();

        let del = app
            .delete_with_token(&format!("{}/{key}", routes::MEDIA), &token)
            .await;
        assert_eq!(del.status, 204);

        let res = app
            .client
            .get(app.url(&path))
            .header("If-None-Match", etag)
            .send()
            .await
            .expect("Failed to fetch image");
        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn delete_by_public_url() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let up = app
            .upload_with_token("u.png", "image/png", png(4, 4, 10), &token)
            .await;
        let url = up.body["url"].as_str().unwrap().to_string();

        let res = app
            .client
            .delete(app.url(&format!("{}/by-url", routes::MEDIA)))
            .query(&[("url", url.as_str())])
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");
        assert_eq!(res.status(), 204);

        let list = app.get_with_token(routes::MEDIA, &token).await;
        assert_eq!(list.body["data"], json!([]));
    }

    #[tokio::test]
    async fn list_is_paginated_newest_first() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let mut keys = Vec::new();
        for seed in 0..3 {
            let up = app
                .upload_with_token("p.png", "image/png", png(4, 4, 100 + seed), &token)
                .await;
            keys.push(key_of(&up));
        }

        let res = app
            .get_with_token(&format!("{}?page=1&per_page=2", routes::MEDIA), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["key"], keys[2].as_str());
    }
}
