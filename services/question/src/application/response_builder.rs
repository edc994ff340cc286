// upsertレスポンス生成
//
// 既存クライアント（Angularアプリ）との互換のため、ヘッダーは固定値をそのまま返す。

use lambda_http::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, VARY,
};
use lambda_http::{Body, Response};

use crate::domain::Question;

/// 先頭のシングルクォートも含めて既存APIの値のまま
const ALLOW_HEADERS: &str = "'Content-Type,X-Amz-Date,Authorization,X-Api-Key,x-requested-with";

/// upsertレスポンス生成
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// 更新後レコードをJSONボディに持つ200レスポンス
    pub fn ok(question: &Question) -> Result<Response<Body>, ResponseError> {
        let json = serde_json::to_string(question)?;
        Self::build(Body::Text(json))
    }

    /// CORSプリフライト用の空ボディ200レスポンス
    pub fn preflight() -> Result<Response<Body>, ResponseError> {
        Self::build(Body::Empty)
    }

    fn build(body: Body) -> Result<Response<Body>, ResponseError> {
        let mut response = Response::builder().status(200).body(body)?;
        *response.headers_mut() = Self::build_headers();
        Ok(response)
    }

    /// 固定レスポンスヘッダーを生成
    ///
    /// - Content-Type: application/json
    /// - X-Requested-With: *
    /// - Access-Control-Allow-Headers: 'Content-Type,X-Amz-Date,Authorization,X-Api-Key,x-requested-with
    /// - Access-Control-Allow-Origin: *
    /// - Access-Control-Allow-Methods: OPTIONS,*
    /// - Vary: Origin
    /// - Access-Control-Allow-Credentials: true
    pub fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // X-Requested-With（http crateに定数がない）
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("*"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("OPTIONS,*"),
        );
        // プロキシ向け
        headers.insert(VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );

        headers
    }
}

/// レスポンス生成エラー
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("failed to serialize question: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to build response: {0}")]
    Http(#[from] lambda_http::http::Error),
}
