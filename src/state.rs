//! Application state shared by request handlers.

use crate::web::proxy::SearchProxy;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<SearchProxy>,
}

impl AppState {
    pub fn new(proxy: SearchProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}
