//! HTML pages
//!
//! Pages are minijinja templates read once at startup from
//! `<WORKING_DIRECTORY>/templates`. A file that is missing or does not parse
//! falls back to the copy compiled into the binary. Every template name ends
//! in `.html`, so interpolated values are HTML-escaped.

use std::fmt;
use std::path::Path;

use minijinja::{context, Environment, Value};

const DEFAULT_LOGIN: &str = include_str!("../templates/login.html");
const DEFAULT_HOME: &str = include_str!("../templates/home.html");
const DEFAULT_ERROR: &str = include_str!("../templates/error.html");

/// Served when even the built-in error page cannot render
const LAST_RESORT: &str = "<!DOCTYPE html><title>Murmur</title><p>Something went wrong.</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Login,
    Home,
    Error,
}

impl Page {
    const ALL: [Page; 3] = [Page::Login, Page::Home, Page::Error];

    fn file_name(self) -> &'static str {
        match self {
            Self::Login => "login.html",
            Self::Home => "home.html",
            Self::Error => "error.html",
        }
    }

    fn built_in(self) -> &'static str {
        match self {
            Self::Login => DEFAULT_LOGIN,
            Self::Home => DEFAULT_HOME,
            Self::Error => DEFAULT_ERROR,
        }
    }
}

/// Loaded page templates
pub struct Pages {
    env: Environment<'static>,
    built_in: Environment<'static>,
}

impl Default for Pages {
    fn default() -> Self {
        let built_in = built_in_environment();
        Self {
            env: built_in.clone(),
            built_in,
        }
    }
}

impl fmt::Debug for Pages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pages")
            .field(
                "templates",
                &self.env.templates().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Pages {
    /// Load templates from `dir`, falling back to the built-in pages
    pub fn load(dir: &Path) -> Self {
        let mut env = built_in_environment();

        for page in Page::ALL {
            let path = dir.join(page.file_name());
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Page template unreadable, using built-in page"
                    );
                    continue;
                }
            };

            match env.add_template_owned(page.file_name(), source) {
                Ok(()) => tracing::debug!(path = %path.display(), "Loaded page template"),
                // A failed add keeps the built-in entry
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Page template does not parse, using built-in page"
                ),
            }
        }

        Self {
            env,
            built_in: built_in_environment(),
        }
    }

    /// Sign-in page carrying the OAuth client id for the Google button
    pub fn login(&self, client_id: &str) -> String {
        self.render(Page::Login, context! { client_id })
    }

    /// Text submission page
    pub fn home(&self) -> String {
        self.render(Page::Home, context! {})
    }

    /// Error page showing `message`
    pub fn error(&self, message: &str) -> String {
        self.render(Page::Error, context! { message })
    }

    fn render(&self, page: Page, ctx: Value) -> String {
        let name = page.file_name();
        match self.env.get_template(name).and_then(|t| t.render(&ctx)) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(
                    page = name,
                    error = %e,
                    "Page failed to render, using built-in page"
                );
                self.built_in
                    .get_template(name)
                    .and_then(|t| t.render(&ctx))
                    .unwrap_or_else(|_| LAST_RESORT.to_string())
            }
        }
    }
}

fn built_in_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for page in Page::ALL {
        if let Err(e) = env.add_template(page.file_name(), page.built_in()) {
            tracing::error!(
                page = page.file_name(),
                error = %e,
                "Built-in page template does not parse"
            );
        }
    }
    env
}
