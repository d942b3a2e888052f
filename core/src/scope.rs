// listshare/src/scope.rs

use crate::error::ListResult;
use crate::model::UserId;
use crate::store::IdentityStore;
use std::collections::HashSet;
use std::sync::Arc;

/// The owner identities whose items `viewer` may read or mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
  pub viewer: UserId,
  pub owners: HashSet<UserId>,
}

impl Scope {
  pub fn contains(&self, owner: &UserId) -> bool {
    self.owners.contains(owner)
  }
}

/// Computes scopes from the current partner graph. Nothing is cached, and
/// partners of partners are never included.
#[derive(Clone)]
pub struct ScopeResolver {
  identities: Arc<dyn IdentityStore>,
}

impl ScopeResolver {
  pub fn new(identities: Arc<dyn IdentityStore>) -> Self {
    Self { identities }
  }

  pub async fn resolve(&self, user_id: UserId) -> ListResult<Scope> {
    let mut owners = self.identities.partners_of(user_id).await?;
    owners.insert(user_id);
    Ok(Scope {
      viewer: user_id,
      owners,
    })
  }
}
