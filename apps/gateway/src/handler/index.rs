//! # トップページとフォールバック

use axum::response::{Html, Response};
use base_api_shared::ErrorInfo;

use crate::error::{RequestContext, build_error_response};

/// トップページ
pub async fn index() -> Html<&'static str> {
   Html("<h1 align='center'>Welcome To Base API</h1>")
}

/// どのルートにも一致しないリクエスト
pub async fn not_found(request: RequestContext) -> Response {
   build_error_response(ErrorInfo::NOT_FOUND, None, Some(&request))
}
