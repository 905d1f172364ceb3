use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use clinica_core::{ConsultaChanges, ExamInput, NewConsulta, NewProntuario, ProntuarioChanges};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;
type Payload<T> = Result<Json<T>, JsonRejection>;

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"status": "ok", "backend": state.backend}))
}

// ---- Consultas ----

pub async fn create_consulta(
    State(state): State<AppState>,
    payload: Payload<NewConsulta>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(data) = payload?;
    data.validate()?;
    let consulta = state.consultas.create(data).await?;
    Ok((StatusCode::CREATED, Json(consulta.to_json())))
}

pub async fn list_consultas(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let consultas = state.consultas.list().await?;
    Ok(Json(Value::Array(
        consultas.iter().map(|c| c.to_json()).collect(),
    )))
}

pub async fn get_consulta(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    match state.consultas.get(id).await? {
        Some(consulta) => Ok(Json(consulta.to_json())),
        None => Err(ApiError::not_found("Consulta", id)),
    }
}

pub async fn update_consulta(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Payload<ConsultaChanges>,
) -> ApiResult<Json<Value>> {
    let Json(changes) = payload?;
    changes.validate()?;
    if state.consultas.update(id, changes).await? == 0 {
        return Err(ApiError::not_found("Consulta", id));
    }
    get_consulta(State(state), Path(id)).await
}

pub async fn delete_consulta(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if state.consultas.delete(id).await? == 0 {
        return Err(ApiError::not_found("Consulta", id));
    }
    Ok(Json(json!({"message": format!("Consulta {id} deleted")})))
}

// ---- Prontuarios ----

pub async fn create_prontuario(
    State(state): State<AppState>,
    payload: Payload<NewProntuario>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(data) = payload?;
    data.validate()?;
    let prontuario = state.prontuarios.create(data).await?;
    Ok((StatusCode::CREATED, Json(prontuario.to_json())))
}

pub async fn list_prontuarios(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let prontuarios = state.prontuarios.list().await?;
    Ok(Json(Value::Array(
        prontuarios.iter().map(|p| p.to_json()).collect(),
    )))
}

pub async fn get_prontuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    match state.prontuarios.get(id).await? {
        Some(prontuario) => Ok(Json(prontuario.to_json())),
        None => Err(ApiError::not_found("Prontuario", id)),
    }
}

pub async fn update_prontuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Payload<ProntuarioChanges>,
) -> ApiResult<Json<Value>> {
    let Json(changes) = payload?;
    changes.validate()?;
    if state.prontuarios.update(id, changes).await? == 0 {
        return Err(ApiError::not_found("Prontuario", id));
    }
    get_prontuario(State(state), Path(id)).await
}

pub async fn delete_prontuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if state.prontuarios.delete(id).await? == 0 {
        return Err(ApiError::not_found("Prontuario", id));
    }
    Ok(Json(json!({"message": format!("Prontuario {id} deleted")})))
}

pub async fn add_exam(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Payload<ExamInput>,
) -> ApiResult<Json<Value>> {
    let Json(exam) = payload?;
    exam.validate()?;
    match state.prontuarios.add_exam(id, exam).await? {
        Some(prontuario) => Ok(Json(prontuario.to_json())),
        None => Err(ApiError::not_found("Prontuario", id)),
    }
}

pub async fn remove_exams(
    State(state): State<AppState>,
    Path((id, name)): Path<(i64, String)>,
) -> ApiResult<Json<Value>> {
    match state.prontuarios.remove_exams(id, &name).await? {
        Some(prontuario) => Ok(Json(prontuario.to_json())),
        None => Err(ApiError::not_found("Prontuario", id)),
    }
}
