// Domain modules
pub mod banners;
