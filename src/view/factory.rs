use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("errors/layout.html", include_str!("templates/errors/layout.html")),
    ("errors/default.html", include_str!("templates/errors/default.html")),
    ("errors/400.html", include_str!("templates/errors/400.html")),
    ("errors/401.html", include_str!("templates/errors/401.html")),
    ("errors/403.html", include_str!("templates/errors/403.html")),
    ("errors/404.html", include_str!("templates/errors/404.html")),
    ("errors/405.html", include_str!("templates/errors/405.html")),
    ("errors/500.html", include_str!("templates/errors/500.html")),
    ("errors/503.html", include_str!("templates/errors/503.html")),
];

fn builtin_template(path: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, source)| *source)
}

/// File a view name refers to: `errors.404` is `errors/404.html`.
#[must_use]
pub fn template_path(view: &str) -> String {
    format!("{}.html", view.replace('.', "/"))
}

/// Why a view could not be rendered.
#[derive(Debug)]
pub enum ViewError {
    /// Neither the views directory nor the built-ins have the view.
    NotFound { view: String },
    /// The template exists but failed to compile or render.
    Render { view: String, source: minijinja::Error },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::NotFound { view } => write!(f, "view '{view}' not found"),
            ViewError::Render { view, source } => write!(f, "failed to render view '{view}': {source}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::NotFound { .. } => None,
            ViewError::Render { source, .. } => Some(source),
        }
    }
}

/// Loads and renders views.
pub struct ViewFactory {
    env: Environment<'static>,
    views_dir: Option<PathBuf>,
}

impl fmt::Debug for ViewFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFactory")
            .field("views_dir", &self.views_dir)
            .finish_non_exhaustive()
    }
}

impl Default for ViewFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFactory {
    /// A factory serving only the built-in views.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A factory that prefers templates found under `dir`.
    #[must_use]
    pub fn with_views_dir(dir: impl Into<PathBuf>) -> Self {
        Self::build(Some(dir.into()))
    }

    fn build(views_dir: Option<PathBuf>) -> Self {
        let mut env = Environment::new();
        let dir_loader = views_dir.clone().map(minijinja::path_loader);
        env.set_loader(move |name| {
            if let Some(load) = &dir_loader {
                if let Some(source) = load(name)? {
                    return Ok(Some(source));
                }
            }
            Ok(builtin_template(name).map(str::to_string))
        });

        debug!(views_dir = ?views_dir, "View factory created");
        Self { env, views_dir }
    }

    #[must_use]
    pub fn views_dir(&self) -> Option<&Path> {
        self.views_dir.as_deref()
    }

    /// Whether `view` can be loaded and compiled.
    #[must_use]
    pub fn exists(&self, view: &str) -> bool {
        self.env.get_template(&template_path(view)).is_ok()
    }

    /// Render `view` with `ctx`.
    pub fn render<S: Serialize>(&self, view: &str, ctx: S) -> Result<String, ViewError> {
        let path = template_path(view);
        let template = self.env.get_template(&path).map_err(|err| {
            if err.kind() == ErrorKind::TemplateNotFound {
                ViewError::NotFound {
                    view: view.to_string(),
                }
            } else {
                warn!(view = %view, error = %err, "View failed to compile");
                ViewError::Render {
                    view: view.to_string(),
                    source: err,
                }
            }
        })?;

        template.render(ctx).map_err(|err| {
            warn!(view = %view, error = %err, "View failed to render");
            ViewError::Render {
                view: view.to_string(),
                source: err,
            }
        })
    }
}
