use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{
    about, auth, bi, client, contact, hero_slide, media, payment_method, service, social_link,
    taxonomy, team, template, testimonial, value,
};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/site", site_routes())
        .nest("/contact", OpenApiRouter::new().routes(routes!(contact::submit_contact)))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes(config))
}

/// Public, read-only content consumed by the site pages.
fn site_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(hero_slide::list_hero_slides))
        .routes(routes!(service::list_services))
        .routes(routes!(template::list_templates))
        .routes(routes!(taxonomy::list_categories))
        .routes(routes!(taxonomy::list_keywords))
        .routes(routes!(testimonial::list_testimonials))
        .routes(routes!(team::list_team_members))
        .routes(routes!(client::list_clients))
        .routes(routes!(value::list_values))
        .routes(routes!(social_link::list_social_links))
        .routes(routes!(payment_method::list_payment_methods))
        .routes(routes!(about::get_about_us))
        .routes(routes!(bi::get_bi_page))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

fn admin_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/hero-slides", hero_slide_routes())
        .nest("/services", service_routes())
        .nest("/templates", template_routes())
        .nest("/categories", category_routes())
        .nest("/keywords", keyword_routes())
        .nest("/testimonials", testimonial_routes())
        .nest("/team", team_routes())
        .nest("/clients", client_routes())
        .nest("/values", value_routes())
        .nest("/social-links", social_link_routes())
        .nest("/payment-methods", payment_method_routes())
        .nest(
            "/about",
            OpenApiRouter::new().routes(routes!(about::admin_get_about_us, about::upsert_about_us)),
        )
        .nest("/bi", bi_routes())
        .nest("/media", media_routes(config))
        .nest("/messages", message_routes())
        .nest("/users", user_routes())
}

fn hero_slide_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            hero_slide::admin_list_hero_slides,
            hero_slide::create_hero_slide
        ))
        .routes(routes!(hero_slide::reorder_hero_slides))
        .routes(routes!(
            hero_slide::get_hero_slide,
            hero_slide::update_hero_slide,
            hero_slide::delete_hero_slide
        ))
}

fn service_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(service::admin_list_services, service::create_service))
        .routes(routes!(service::reorder_services))
        .routes(routes!(
            service::get_service,
            service::update_service,
            service::delete_service
        ))
}

fn template_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(template::admin_list_templates, template::create_template))
        .routes(routes!(template::reorder_templates))
        .routes(routes!(
            template::get_template,
            template::update_template,
            template::delete_template
        ))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            taxonomy::admin_list_categories,
            taxonomy::create_category
        ))
        .routes(routes!(
            taxonomy::get_category,
            taxonomy::update_category,
            taxonomy::delete_category
        ))
}

fn keyword_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(taxonomy::admin_list_keywords, taxonomy::create_keyword))
        .routes(routes!(
            taxonomy::get_keyword,
            taxonomy::update_keyword,
            taxonomy::delete_keyword
        ))
}

fn testimonial_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            testimonial::admin_list_testimonials,
            testimonial::create_testimonial
        ))
        .routes(routes!(testimonial::reorder_testimonials))
        .routes(routes!(
            testimonial::get_testimonial,
            testimonial::update_testimonial,
            testimonial::delete_testimonial
        ))
}

fn team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(team::admin_list_team_members, team::create_team_member))
        .routes(routes!(team::reorder_team_members))
        .routes(routes!(
            team::get_team_member,
            team::update_team_member,
            team::delete_team_member
        ))
}

fn client_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(client::admin_list_clients, client::create_client))
        .routes(routes!(client::reorder_clients))
        .routes(routes!(
            client::get_client,
            client::update_client,
            client::delete_client
        ))
}

fn value_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(value::admin_list_values, value::create_value))
        .routes(routes!(value::reorder_values))
        .routes(routes!(value::get_value, value::update_value, value::delete_value))
}

fn social_link_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            social_link::admin_list_social_links,
            social_link::create_social_link
        ))
        .routes(routes!(social_link::reorder_social_links))
        .routes(routes!(
            social_link::get_social_link,
            social_link::update_social_link,
            social_link::delete_social_link
        ))
}

fn payment_method_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            payment_method::admin_list_payment_methods,
            payment_method::create_payment_method
        ))
        .routes(routes!(payment_method::reorder_payment_methods))
        .routes(routes!(
            payment_method::get_payment_method,
            payment_method::update_payment_method,
            payment_method::delete_payment_method
        ))
}

fn bi_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(bi::get_bi_hero, bi::upsert_bi_hero))
        .routes(routes!(bi::get_bi_video, bi::upsert_bi_video))
        .routes(routes!(bi::list_bi_features, bi::create_bi_feature))
        .routes(routes!(bi::reorder_bi_features))
        .routes(routes!(
            bi::get_bi_feature,
            bi::update_bi_feature,
            bi::delete_bi_feature
        ))
        .routes(routes!(bi::list_bi_faqs, bi::create_bi_faq))
        .routes(routes!(bi::reorder_bi_faqs))
        .routes(routes!(bi::get_bi_faq, bi::update_bi_faq, bi::delete_bi_faq))
}

fn media_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(media::upload_image, media::list_images))
        .layer(media::image_upload_body_limit(config.storage.max_image_size));

    let manage = OpenApiRouter::new()
        .routes(routes!(media::delete_image_by_url))
        .routes(routes!(media::delete_image));

    upload.merge(manage)
}

fn message_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(contact::list_messages))
        .routes(routes!(contact::delete_message))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::list_users))
        .routes(routes!(auth::update_user_role))
}
