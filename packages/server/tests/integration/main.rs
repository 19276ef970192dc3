mod common;

mod auth;
mod contact;
mod content;
mod media;
mod routing;
mod template;
