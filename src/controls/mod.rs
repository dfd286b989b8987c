/*
 * Win32 backends for the portable widget core: GDI drawing, the window host,
 * message interception through window subclassing, and the styling
 * conversions they share.
 */

pub mod drawing_handler;
pub mod styling_handler;
pub mod subclass_handler;
pub mod window_host;

pub use drawing_handler::GdiDrawing;
pub use subclass_handler::Win32SubclassRegistry;
pub use window_host::Win32WindowHost;
