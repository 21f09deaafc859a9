//! # Access policy — who may do what to which resource
//!
//! [`authorize`] is a pure decision over an explicit [`Actor`], an [`Action`]
//! and a [`Resource`]. It never reads a session or a store itself; the flows in
//! [`crate::App`] resolve the actor and load the resource first.
//!
//! | Resource | Anonymous | Signed in |
//! |----------|-----------|-----------|
//! | secrets list / secret detail | allowed, authors masked | allowed |
//! | create secret | sign-in required | allowed |
//! | edit / delete secret | sign-in required | author only |
//! | users list, sign-up form | allowed | allowed |
//! | user detail | sign-in required | allowed |
//! | edit / delete user | sign-in required | that user only |

use std::fmt;

use serde::{Deserialize, Serialize};
use store::UserInfo;
use uuid::Uuid;

use crate::routes;

/// The party making a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(UserInfo),
}

impl Actor {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::Anonymous => None,
            Actor::User(user) => Some(user.id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Actor::Anonymous)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    ViewList,
    ViewDetail,
    Create,
    Edit,
    Delete,
}

/// What an action targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Secrets,
    Secret { author_id: Uuid },
    Users,
    User { id: Uuid },
}

/// Why a request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denial {
    /// Anonymous actor; send them to the sign-in page.
    SignInRequired,
    /// Signed in, but the resource belongs to someone else.
    NotOwner,
    /// The action has no meaning for that resource, e.g. creating a
    /// specific user or editing a whole collection.
    Inapplicable,
}

impl Denial {
    pub fn redirect_to(&self) -> &'static str {
        match self {
            Denial::SignInRequired => routes::SIGN_IN,
            Denial::NotOwner => routes::SECRETS,
            Denial::Inapplicable => routes::ROOT,
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::SignInRequired => f.write_str("sign in required"),
            Denial::NotOwner => f.write_str("not the owner"),
            Denial::Inapplicable => f.write_str("action does not apply to this resource"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// `Ok` on allow, the denial otherwise.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial),
        }
    }
}

fn owner_only(actor: &Actor, owner: Uuid) -> Decision {
    match actor.user_id() {
        None => Decision::Deny(Denial::SignInRequired),
        Some(id) if id == owner => Decision::Allow,
        Some(_) => Decision::Deny(Denial::NotOwner),
    }
}

fn signed_in(actor: &Actor) -> Decision {
    if actor.is_anonymous() {
        Decision::Deny(Denial::SignInRequired)
    } else {
        Decision::Allow
    }
}

pub fn authorize(actor: &Actor, action: Action, resource: Resource) -> Decision {
    match (resource, action) {
        (Resource::Secrets, Action::ViewList) | (Resource::Secret { .. }, Action::ViewDetail) => {
            Decision::Allow
        }
        (Resource::Secrets, Action::Create) => signed_in(actor),
        (Resource::Secret { author_id }, Action::Edit | Action::Delete) => owner_only(actor, author_id),

        // Sign-up goes through Create on the collection.
        (Resource::Users, Action::ViewList | Action::Create) => Decision::Allow,
        (Resource::User { .. }, Action::ViewDetail) => signed_in(actor),
        (Resource::User { id }, Action::Edit | Action::Delete) => owner_only(actor, id),

        (Resource::Secrets | Resource::Users, Action::ViewDetail | Action::Edit | Action::Delete)
        | (Resource::Secret { .. } | Resource::User { .. }, Action::ViewList | Action::Create) => {
            Decision::Deny(Denial::Inapplicable)
        }
    }
}

/// Name to render for a secret's author.
pub fn author_display<'a>(actor: &Actor, author_name: &'a str, placeholder: &'a str) -> &'a str {
    if actor.is_anonymous() {
        placeholder
    } else {
        author_name
    }
}
