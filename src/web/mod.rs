//! Web 服务器模块
//!
//! 为前端提供翻译、文本收集和语言列表接口

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use error::WebError;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::{TranslationConfig, TranslationService};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    translation_config: TranslationConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, translation_config: TranslationConfig) -> Self {
        Self {
            config,
            translation_config,
        }
    }

    /// 启动 Web 服务器
    ///
    /// 缓存文件损坏时直接返回错误，不会以空缓存启动。
    pub async fn start(&self) -> Result<(), WebError> {
        self.config.validate()?;

        let service = TranslationService::from_config(self.translation_config.clone())?;
        let app = create_router(Arc::new(AppState::new(service)));

        let address = self.config.listen_address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|source| WebError::Bind {
                address: address.clone(),
                source,
            })?;

        tracing::info!("Web 服务启动于 http://{}", address);

        axum::serve(listener, app).await.map_err(WebError::Serve)?;

        Ok(())
    }
}

/// 创建带 CORS 的完整路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
