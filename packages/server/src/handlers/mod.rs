pub mod about;
pub mod auth;
pub mod bi;
pub mod client;
pub mod contact;
pub mod health;
pub mod hero_slide;
pub mod media;
pub mod payment_method;
pub mod service;
pub mod social_link;
pub mod taxonomy;
pub mod team;
pub mod template;
pub mod testimonial;
pub mod value;

mod rows;
