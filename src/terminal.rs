//! Line-oriented front-end for the screens.
//!
//! Each input line is one user action on the visible screen. Screens, field
//! errors and toasts are written to the output as plain text.

use time::macros::format_description;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::screens::{
    EditableField, Effect, LoginScreen, MenuItem, Navigator, ProfileScreen, Screen,
};
use crate::state::AppState;

const LOGIN_HELP: &str = "commands: email <text>, password <text>, login, register, wechat, apple, help, quit";
const PROFILE_HELP: &str = "commands: show, username <text>, signature <text>, avatar, info, favorites, history, about, feedback, logout, back, help, quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Exit,
}

pub struct App {
    state: AppState,
    nav: Navigator,
    login: LoginScreen,
    profile: Option<ProfileScreen>,
    signed_in: Option<String>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let login = LoginScreen::new(state.credentials.clone());
        Self {
            state,
            nav: Navigator::new(),
            login,
            profile: None,
            signed_in: None,
        }
    }

    pub fn current(&self) -> Screen {
        self.nav.current()
    }

    /// Handle one input line, appending anything to show to `out`.
    async fn handle(&mut self, line: &str, out: &mut Vec<String>) -> anyhow::Result<Control> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (cmd, arg) = match line.trim_start().split_once(' ') {
            Some((cmd, arg)) => (cmd, arg),
            None => (line.trim(), ""),
        };
        if cmd.is_empty() {
            return Ok(Control::Continue);
        }
        debug!(screen = ?self.current(), cmd, "input");

        if cmd == "quit" || cmd == "exit" {
            return Ok(Control::Exit);
        }

        match self.current() {
            Screen::Login => self.handle_login(cmd, arg, out).await,
            Screen::Profile => self.handle_profile(cmd, arg, out).await,
        }
    }

    async fn handle_login(
        &mut self,
        cmd: &str,
        arg: &str,
        out: &mut Vec<String>,
    ) -> anyhow::Result<Control> {
        let effects = match cmd {
            "email" => {
                self.login.on_email_changed(arg);
                if let Some(e) = self.login.email().error {
                    out.push(format!("! email: {e}"));
                }
                return Ok(Control::Continue);
            }
            "password" => {
                self.login.on_password_changed(arg);
                if let Some(e) = self.login.password().error {
                    out.push(format!("! password: {e}"));
                }
                return Ok(Control::Continue);
            }
            "login" => self.login.submit_login().await?,
            "register" => self.login.submit_register().await?,
            "wechat" => self.login.wechat_login(),
            "apple" => self.login.apple_login(),
            "show" => {
                self.render(out);
                return Ok(Control::Continue);
            }
            "back" => return Ok(Control::Exit),
            "help" => {
                out.push(LOGIN_HELP.into());
                return Ok(Control::Continue);
            }
            other => {
                out.push(format!("unknown command {other:?}; {LOGIN_HELP}"));
                return Ok(Control::Continue);
            }
        };
        self.apply(effects, out).await?;
        Ok(Control::Continue)
    }

    async fn handle_profile(
        &mut self,
        cmd: &str,
        arg: &str,
        out: &mut Vec<String>,
    ) -> anyhow::Result<Control> {
        let Some(profile) = self.profile.as_mut() else {
            anyhow::bail!("profile screen visible without being opened");
        };

        let effects = match cmd {
            "show" => {
                self.render(out);
                return Ok(Control::Continue);
            }
            "username" | "signature" => {
                let field = if cmd == "username" {
                    EditableField::Username
                } else {
                    EditableField::Signature
                };
                if arg.is_empty() {
                    let dialog = profile.begin_edit(field);
                    out.push(format!(
                        "{} (current: {}); usage: {cmd} <new value>",
                        dialog.title, dialog.initial
                    ));
                    return Ok(Control::Continue);
                }
                profile.save_edit(field, arg).await?
            }
            "avatar" => profile.select(MenuItem::Avatar),
            "info" => profile.select(MenuItem::PersonalInfo),
            "favorites" => profile.select(MenuItem::Favorites),
            "history" => profile.select(MenuItem::History),
            "about" => profile.select(MenuItem::AboutUs),
            "feedback" => profile.select(MenuItem::Feedback),
            "logout" => profile.logout(),
            "back" => {
                self.profile = None;
                if !self.nav.back() {
                    return Ok(Control::Exit);
                }
                self.render(out);
                return Ok(Control::Continue);
            }
            "help" => {
                out.push(PROFILE_HELP.into());
                return Ok(Control::Continue);
            }
            other => {
                out.push(format!("unknown command {other:?}; {PROFILE_HELP}"));
                return Ok(Control::Continue);
            }
        };
        self.apply(effects, out).await?;
        Ok(Control::Continue)
    }

    async fn apply(&mut self, effects: Vec<Effect>, out: &mut Vec<String>) -> anyhow::Result<()> {
        for effect in effects {
            self.nav.apply(&effect);
            match effect {
                Effect::Toast(msg) => out.push(format!("* {msg}")),
                Effect::FieldError(field, e) => out.push(format!("! {}: {e}", field.label())),
                Effect::SignedIn(email) => self.signed_in = Some(email),
                Effect::Push(Screen::Profile) | Effect::ResetTo(Screen::Profile) => {
                    self.open_profile().await?;
                    self.render(out);
                }
                Effect::ResetTo(Screen::Login) => {
                    self.profile = None;
                    self.signed_in = None;
                    self.login = LoginScreen::new(self.state.credentials.clone());
                    self.render(out);
                }
                Effect::Push(Screen::Login) => self.render(out),
            }
        }
        Ok(())
    }

    async fn open_profile(&mut self) -> anyhow::Result<()> {
        let account = match &self.signed_in {
            Some(email) => self.state.credentials.find_by_email(email).await?,
            None => None,
        };
        self.profile = Some(ProfileScreen::open(self.state.profile.clone(), account).await?);
        Ok(())
    }

    fn render(&self, out: &mut Vec<String>) {
        match (self.current(), &self.profile) {
            (Screen::Profile, Some(profile)) => {
                out.push("== Profile ==".into());
                if let Some(user) = profile.account() {
                    let since = user
                        .created_at
                        .and_then(|t| t.format(format_description!("[year]-[month]-[day]")).ok());
                    match since {
                        Some(since) => {
                            out.push(format!("Signed in as {} (member since {since})", user.email))
                        }
                        None => out.push(format!("Signed in as {}", user.email)),
                    }
                }
                out.push(format!("Username:  {}", profile.username()));
                out.push(format!("Signature: {}", profile.signature()));
            }
            _ => {
                let email = self.login.email();
                let password = self.login.password();
                out.push("== Login ==".into());
                out.push(format!("Email:    {}", email.text));
                out.push(format!("Password: {}", "*".repeat(password.text.chars().count())));
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.current() {
            Screen::Login => "login> ",
            Screen::Profile => "profile> ",
        }
    }
}

/// Drive the app from `input` until `quit`, end of input, or backing out of
/// the root screen.
pub async fn run<R, W>(state: AppState, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut app = App::new(state);
    let mut lines = input.lines();
    let mut out = Vec::new();

    app.render(&mut out);
    out.push(LOGIN_HELP.into());

    loop {
        for line in out.drain(..) {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.write_all(app.prompt().as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };
        if app.handle(&line, &mut out).await? == Control::Exit {
            break;
        }
    }

    for line in out.drain(..) {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    output.write_all(b"Goodbye!\n").await?;
    output.flush().await?;
    Ok(())
}
