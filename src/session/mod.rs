//! Client-side session state: results, the editable table, history, and the
//! controller that ties them together. Nothing in here touches the DOM.

pub mod bulk;
pub mod collection;
pub mod controller;
pub mod driver;
pub mod entry;
pub mod history;
pub mod input;
pub mod notice;
pub mod regenerate;
pub mod table;

pub use controller::{ActiveView, Phase, SessionController, SubmitOutcome};
pub use driver::ControllerCell;
