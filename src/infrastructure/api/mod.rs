mod http_api;

pub use http_api::HttpApi;
