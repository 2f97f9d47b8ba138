//! # TUI Components
//!
//! All UI components for the search screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `Header`: logo, status text and key hints
//! - `Loading`: spinner shown while a search runs
//! - `ToastLine`: transient notification line
//! - `AlertDialog`: blocking modal
//! - `MapScreen`: placeholder secondary screen
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `SearchBar`: query field with the search/clear button
//! - `MovieGrid`: responsive poster grid with keyboard selection
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs         (this file)
//! ├── header.rs
//! ├── search_bar.rs
//! ├── movie_grid.rs
//! ├── loading.rs
//! ├── toast.rs
//! ├── alert.rs
//! └── map.rs
//! ```

pub mod alert;
pub mod header;
pub mod loading;
pub mod map;
pub mod movie_grid;
pub mod search_bar;
pub mod toast;

pub use alert::AlertDialog;
pub use header::Header;
pub use loading::Loading;
pub use map::MapScreen;
pub use movie_grid::{GridEvent, MovieGrid, MovieGridState};
pub use search_bar::{SearchBar, SearchBarEvent};
pub use toast::ToastLine;
