use std::sync::Arc;

use super::{Effect, Screen};
use crate::auth::User;
use crate::profile::ProfileStore;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Username,
    Signature,
}

impl EditableField {
    pub fn label(self) -> &'static str {
        match self {
            EditableField::Username => "Username",
            EditableField::Signature => "Signature",
        }
    }
}

/// Rows on the profile screen that only show an informational toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Avatar,
    PersonalInfo,
    Favorites,
    History,
    AboutUs,
    Feedback,
}

impl MenuItem {
    fn message(self) -> String {
        match self {
            MenuItem::Avatar => "Avatar: tap to change your avatar".into(),
            MenuItem::PersonalInfo => "Personal info: view your detailed profile".into(),
            MenuItem::Favorites => "Favorites: view saved items".into(),
            MenuItem::History => "History: view recently browsed items".into(),
            MenuItem::AboutUs => format!("About us: app version {APP_VERSION}"),
            MenuItem::Feedback => "Feedback: send us your suggestions".into(),
        }
    }
}

/// State of an open edit dialog. Dropping it is the same as cancelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub field: EditableField,
    pub title: String,
    pub initial: String,
}

pub struct ProfileScreen {
    store: Arc<dyn ProfileStore>,
    account: Option<User>,
    username: String,
    signature: String,
}

impl ProfileScreen {
    /// Load the stored profile (or its defaults) for display.
    pub async fn open(
        store: Arc<dyn ProfileStore>,
        account: Option<User>,
    ) -> anyhow::Result<Self> {
        let profile = store.get().await?;
        Ok(Self {
            store,
            account,
            username: profile.username,
            signature: profile.signature,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn account(&self) -> Option<&User> {
        self.account.as_ref()
    }

    pub fn begin_edit(&self, field: EditableField) -> EditDialog {
        let initial = match field {
            EditableField::Username => self.username.clone(),
            EditableField::Signature => self.signature.clone(),
        };
        EditDialog {
            field,
            title: format!("Edit {}", field.label()),
            initial,
        }
    }

    /// Confirm an edit dialog. Blank input is refused and nothing is stored.
    pub async fn save_edit(
        &mut self,
        field: EditableField,
        value: &str,
    ) -> anyhow::Result<Vec<Effect>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(vec![Effect::toast(format!(
                "{} cannot be empty",
                field.label()
            ))]);
        }

        match field {
            EditableField::Username => {
                self.store.set_username(value).await?;
                self.username = value.to_owned();
            }
            EditableField::Signature => {
                self.store.set_signature(value).await?;
                self.signature = value.to_owned();
            }
        }
        Ok(vec![Effect::toast(format!(
            "{} updated: {value}",
            field.label()
        ))])
    }

    pub fn select(&self, item: MenuItem) -> Vec<Effect> {
        vec![Effect::toast(item.message())]
    }

    pub fn logout(&self) -> Vec<Effect> {
        tracing::info!(
            email = self.account.as_ref().map(|u| u.email.as_str()).unwrap_or("-"),
            "user logged out"
        );
        vec![Effect::toast("Logged out"), Effect::ResetTo(Screen::Login)]
    }
}
