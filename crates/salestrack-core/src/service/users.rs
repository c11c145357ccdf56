//! User CRUD. Users have no derived fields, so writes go straight through.

use uuid::Uuid;

use crate::{
  Error, Result,
  store::{Page, SalesStore},
  user::{NewUser, User, UserFilter, UserPatch},
  validate,
};

pub async fn create_user<S: SalesStore>(store: &S, input: NewUser) -> Result<User> {
  validate::new_user(&input)?;

  let taken = store
    .find_user_by_email(&input.email)
    .await
    .map_err(Error::store)?;
  if taken.is_some() {
    tracing::warn!(email = %input.email, "user email already registered");
    return Err(Error::UserAlreadyExists(input.email));
  }

  let email = input.email.clone();
  let user = store
    .insert_user(input)
    .await
    .map_err(|e| Error::user_write(e, &email))?;
  tracing::info!(user_id = %user.id, "created user");
  Ok(user)
}

pub async fn get_user<S: SalesStore>(store: &S, id: Uuid) -> Result<User> {
  store
    .find_user(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(id))
}

pub async fn list_users<S: SalesStore>(
  store: &S,
  filter: &UserFilter,
  page: Page,
) -> Result<(Vec<User>, u64)> {
  let total = store.count_users(filter).await.map_err(Error::store)?;
  let users = store.list_users(filter, page).await.map_err(Error::store)?;
  Ok((users, total))
}

pub async fn update_user<S: SalesStore>(store: &S, id: Uuid, patch: UserPatch) -> Result<User> {
  if patch.is_empty() {
    return Err(Error::Validation("No update fields provided".into()));
  }
  validate::user_patch(&patch)?;

  let email = patch.email.clone().unwrap_or_default();
  let user = store
    .update_user(id, patch)
    .await
    .map_err(|e| Error::user_write(e, &email))?
    .ok_or(Error::UserNotFound(id))?;
  tracing::info!(user_id = %id, "updated user");
  Ok(user)
}

pub async fn delete_user<S: SalesStore>(store: &S, id: Uuid) -> Result<User> {
  let user = store
    .delete_user(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(id))?;
  tracing::info!(user_id = %id, "deleted user");
  Ok(user)
}
