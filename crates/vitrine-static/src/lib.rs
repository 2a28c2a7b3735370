//! Static prerendering for the vitrine site.
//!
//! Renders every route of a fixed route table into a shared HTML shell and
//! writes one document per route, followed by the sitemap and public assets.

pub mod assembler;
pub mod assets;
pub mod builder;
pub mod pipeline;
pub mod renderer;
pub mod routes;
pub mod seo;
pub mod shell;
pub mod sitemap;
pub mod templates;

pub use assembler::{FsWriter, MemoryWriter, PageAssembler, PageWriter, WriteError};
pub use builder::{BuildConfig, BuildError, BuildResult, Prerenderer};
pub use pipeline::{run, FailurePolicy, PageFailure, PageOutput, PipelineError, Report};
pub use renderer::{ContentRenderer, RenderError, RenderedPage, Renderer, StaticRenderer};
pub use routes::{Route, RouteError, RouteTable};
pub use seo::{HeadMetadata, SiteMeta};
pub use shell::{HtmlShell, ShellError};
