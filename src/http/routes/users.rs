use crate::domain::model::Identity;
use crate::http::auth::CurrentUser;
use axum::Json;

pub async fn read_users_me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}
