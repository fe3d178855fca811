//! Writing drawer pages to disk, as SVG or rasterized to PNG.

use std::path::PathBuf;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use drawermap::RenderedPage;
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Diagnostic, Debug)]
pub enum OutputError {
    #[error("cannot create output directory `{path}`")]
    #[diagnostic(code(drawermap::output::directory))]
    Directory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write `{path}`")]
    #[diagnostic(code(drawermap::output::write))]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot rasterize the page of drawer {drawer}")]
    #[diagnostic(code(drawermap::output::svg))]
    Svg {
        drawer: u32,
        #[source]
        source: usvg::Error,
    },

    #[error("page of drawer {drawer} has no area to rasterize")]
    #[diagnostic(code(drawermap::output::pixmap))]
    Pixmap { drawer: u32 },

    #[error("cannot encode PNG for drawer {drawer}: {message}")]
    #[diagnostic(code(drawermap::output::png))]
    Png { drawer: u32, message: String },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Svg,
    Png,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }
}

/// `drawer-03.svg` and so on; zero-padded so the files sort by drawer.
pub fn page_file_name(drawer: u32, format: Format) -> String {
    format!("drawer-{drawer:02}.{}", format.extension())
}

/// Turns SVG documents into PNG bytes. Font loading happens once.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl Rasterizer {
    /// Relative image references (the logo) resolve against `resources_dir`.
    pub fn new(resources_dir: Option<PathBuf>) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!(faces = fontdb.len(), "loaded system fonts");
        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(fontdb);
        options.resources_dir = resources_dir;
        Rasterizer { options }
    }

    #[cfg(test)]
    fn without_fonts() -> Self {
        Rasterizer {
            options: usvg::Options::default(),
        }
    }

    pub fn png(&self, drawer: u32, svg: &str) -> Result<Vec<u8>, OutputError> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|source| OutputError::Svg { drawer, source })?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or(OutputError::Pixmap { drawer })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        pixmap.encode_png().map_err(|e| OutputError::Png {
            drawer,
            message: e.to_string(),
        })
    }
}

/// Write every page into `dir`, creating it if needed. Returns the written paths.
pub fn write_pages(
    pages: &[RenderedPage],
    dir: &Utf8Path,
    format: Format,
    rasterizer: Option<&Rasterizer>,
) -> Result<Vec<Utf8PathBuf>, OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Directory {
        path: dir.to_owned(),
        source,
    })?;

    let owned;
    let rasterizer = match (format, rasterizer) {
        (Format::Png, None) => {
            owned = Rasterizer::new(None);
            Some(&owned)
        }
        (_, r) => r,
    };

    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = dir.join(page_file_name(page.drawer, format));
        let bytes = match (format, rasterizer) {
            (Format::Png, Some(r)) => r.png(page.drawer, &page.svg)?,
            _ => page.svg.clone().into_bytes(),
        };
        std::fs::write(&path, bytes).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        info!(drawer = page.drawer, %path, "page written");
        written.push(path);
    }
    Ok(written)
}
