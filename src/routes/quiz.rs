use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::identity::CurrentUser;
use crate::response::AppError;
use crate::services::quiz::{self, AnswerOutcome, QuizItem};
use crate::services::quiz_session::QuizView;
use crate::state::AppState;
use crate::words::Difficulty;

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    word: String,
    user_answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerResponse {
    correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
}

impl From<AnswerOutcome> for CheckAnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        Self {
            correct: outcome.correct,
            correct_answer: (!outcome.correct).then_some(outcome.correct_answer),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    difficulty: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnswerRequest {
    user_answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnswerResponse {
    correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
    next: QuizView,
}

fn parse_difficulty(raw: Option<&str>) -> Result<Difficulty, AppError> {
    let raw = raw.ok_or_else(|| AppError::bad_request("difficulty is required"))?;
    raw.parse::<Difficulty>()
        .map_err(|err| AppError::bad_request(err.to_string()))
}

fn fresh_quiz(state: &AppState, difficulty: Difficulty) -> Vec<QuizItem> {
    let words = state.words();
    let mut rng = rand::rng();
    quiz::build_quiz(words.tier(difficulty), &mut rng)
}

pub async fn quiz(
    State(state): State<AppState>,
    query: Result<Query<QuizQuery>, QueryRejection>,
) -> Result<Json<Vec<QuizItem>>, AppError> {
    let Query(query) = query?;
    let difficulty = parse_difficulty(query.difficulty.as_deref())?;
    let items = fresh_quiz(&state, difficulty);
    tracing::debug!(%difficulty, count = items.len(), "quiz batch served");
    Ok(Json(items))
}

pub async fn check_answer(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CheckAnswerRequest>, JsonRejection>,
) -> Result<Json<CheckAnswerResponse>, AppError> {
    let Json(payload) = payload?;
    let words = state.words();
    let users = state.users();

    let outcome = quiz::check_answer(
        &words,
        &users,
        &user.id,
        &payload.word,
        &payload.user_answer,
    )
    .await
    .inspect_err(|err| tracing::warn!(user_id = %user.id, error = %err, "answer check failed"))?;

    Ok(Json(outcome.into()))
}

pub async fn session_view(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Json<QuizView> {
    Json(state.sessions().view(&user.id))
}

pub async fn start_session(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<Json<QuizView>, AppError> {
    let Json(payload) = payload?;
    let difficulty = parse_difficulty(Some(&payload.difficulty))?;
    if !state.users().contains(&user.id).await {
        return Err(AppError::not_found(format!("user not found: {}", user.id)));
    }
    let items = fresh_quiz(&state, difficulty);

    let view = state.sessions().start(&user.id, difficulty, items);
    tracing::info!(user_id = %user.id, %difficulty, "quiz session started");
    Ok(Json(view))
}

pub async fn answer_session(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<SessionAnswerRequest>, JsonRejection>,
) -> Result<Json<SessionAnswerResponse>, AppError> {
    let Json(payload) = payload?;
    let sessions = state.sessions();
    let answered = sessions.answer(&user.id, &payload.user_answer)?;
    let outcome = answered.outcome;

    if outcome.correct {
        if let Err(err) = quiz::reward_user(&state.users(), &user.id).await {
            let restored = sessions.rollback(&user.id, answered.checkpoint);
            tracing::warn!(user_id = %user.id, error = %err, restored, "quiz reward failed");
            return Err(err.into());
        }
    }

    Ok(Json(SessionAnswerResponse {
        correct: outcome.correct,
        correct_answer: (!outcome.correct).then_some(outcome.correct_answer),
        next: answered.next,
    }))
}
