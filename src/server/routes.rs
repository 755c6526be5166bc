//! # 路由层
//!
//! ## 设计思路
//!
//! 路由函数仅做 HTTP 参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `ImageServiceState`，保持路由函数薄、稳定、易测试。
//!
//! 着色参数既可以放在查询串，也可以作为 multipart 文本字段提交，后者优先。

use std::collections::HashMap;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Operation};
use crate::image_handler::tint::{
    DEFAULT_TINT_BLUE, DEFAULT_TINT_FACTOR, DEFAULT_TINT_GREEN, DEFAULT_TINT_RED,
};
use crate::image_handler::{ImageServiceState, TintParameters};

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImageResponse {
    pub processed_image_url: String,
}

/// 着色查询参数，缺省值见 `tint` 模块常量。
#[derive(Debug, Default, Deserialize)]
pub struct TintQuery {
    pub r: Option<i32>,
    pub g: Option<i32>,
    pub b: Option<i32>,
    pub factor: Option<f64>,
}

/// 解析后的 multipart 表单：图片字段与其余文本字段。
#[derive(Debug, Default)]
struct UploadForm {
    image: Option<Vec<u8>>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn require_image(&mut self) -> Result<Vec<u8>, AppError> {
        self.image
            .take()
            .ok_or_else(|| AppError::Validation(format!("field required: {}", IMAGE_FIELD)))
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn remove_background(
    State(state): State<ImageServiceState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessedImageResponse>, AppError> {
    let mut form = read_upload_form(multipart).await?;
    let image = form.require_image()?;

    let processed_image_url = state
        .remove_background(image)
        .await
        .map_err(|e| AppError::from_image(Operation::BackgroundRemoval, e))?;

    Ok(Json(ProcessedImageResponse { processed_image_url }))
}

pub async fn tint(
    State(state): State<ImageServiceState>,
    query: Result<Query<TintQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessedImageResponse>, AppError> {
    let Query(query) =
        query.map_err(|e| AppError::Validation(format!("invalid query: {}", e.body_text())))?;
    let mut form = read_upload_form(multipart).await?;
    let params = resolve_tint_parameters(&query, &form.fields)?;
    let image = form.require_image()?;

    let processed_image_url = state
        .tint(image, params)
        .await
        .map_err(|e| AppError::from_image(Operation::Tint, e))?;

    Ok(Json(ProcessedImageResponse { processed_image_url }))
}

async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadForm, AppError> {
    let mut multipart = multipart.map_err(|e| {
        AppError::BadRequest(format!("invalid multipart request: {}", e.body_text()))
    })?;
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let bytes = field.bytes().await.map_err(map_multipart_error)?;
            form.image = Some(bytes.to_vec());
        } else {
            let text = field.text().await.map_err(map_multipart_error)?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

fn map_multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(error.body_text())
    } else {
        AppError::BadRequest(format!("invalid multipart body: {}", error.body_text()))
    }
}

/// 合并查询串与表单字段，表单字段优先。
fn resolve_tint_parameters(
    query: &TintQuery,
    fields: &HashMap<String, String>,
) -> Result<TintParameters, AppError> {
    let red = form_value::<i32>(fields, "r")?.or(query.r).unwrap_or(DEFAULT_TINT_RED);
    let green = form_value::<i32>(fields, "g")?.or(query.g).unwrap_or(DEFAULT_TINT_GREEN);
    let blue = form_value::<i32>(fields, "b")?.or(query.b).unwrap_or(DEFAULT_TINT_BLUE);
    let factor = form_value::<f64>(fields, "factor")?
        .or(query.factor)
        .unwrap_or(DEFAULT_TINT_FACTOR);
    if !factor.is_finite() {
        return Err(AppError::Validation(format!(
            "factor must be a finite number, got {}",
            factor
        )));
    }

    Ok(TintParameters::new(red, green, blue, factor))
}

fn form_value<T>(fields: &HashMap<String, String>, name: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
{
    match fields.get(name).map(|value| value.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("invalid value for {}: {:?}", name, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let params =
            resolve_tint_parameters(&TintQuery::default(), &HashMap::new()).expect("defaults");

        assert_eq!(params, TintParameters::default());
    }

    #[test]
    fn form_fields_override_query() {
        let query = TintQuery {
            r: Some(1),
            g: Some(2),
            b: None,
            factor: Some(0.9),
        };
        let params = resolve_tint_parameters(&query, &fields(&[("r", "10"), ("factor", " 0.5 ")]))
            .expect("merged params");

        assert_eq!(params, TintParameters::new(10, 2, DEFAULT_TINT_BLUE, 0.5));
    }

    #[test]
    fn out_of_unit_factor_is_kept() {
        let params = resolve_tint_parameters(&TintQuery::default(), &fields(&[("factor", "1.5")]))
            .expect("params");

        assert_eq!(params.factor, 1.5);
    }

    #[test]
    fn non_finite_factor_is_validation_error() {
        for raw in ["NaN", "inf", "-inf"] {
            let result =
                resolve_tint_parameters(&TintQuery::default(), &fields(&[("factor", raw)]));
            assert!(matches!(result, Err(AppError::Validation(_))), "{}", raw);
        }

        let query = TintQuery {
            factor: Some(f64::NAN),
            ..TintQuery::default()
        };
        assert!(matches!(
            resolve_tint_parameters(&query, &HashMap::new()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn invalid_form_value_is_validation_error() {
        let result = resolve_tint_parameters(&TintQuery::default(), &fields(&[("g", "green")]));

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_image_is_validation_error() {
        let mut form = UploadForm::default();

        assert!(matches!(form.require_image(), Err(AppError::Validation(_))));
    }
}
