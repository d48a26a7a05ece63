pub mod request;
pub mod tokeninfo;
pub mod videos;
