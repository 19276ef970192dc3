pub mod about_us;
pub mod bi_faq;
pub mod bi_feature;
pub mod bi_hero;
pub mod bi_video;
pub mod client;
pub mod contact_message;
pub mod corporate_value;
pub mod hero_slide;
pub mod image_object;
pub mod keyword;
pub mod payment_method;
pub mod role;
pub mod role_permission;
pub mod service;
pub mod social_link;
pub mod team_member;
pub mod template;
pub mod template_category;
pub mod template_keyword;
pub mod testimonial;
pub mod user;
