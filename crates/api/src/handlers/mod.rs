pub mod auth;
pub mod author;
pub mod blog_posts;
pub mod books;
pub mod comments;
pub mod history;
