/*
 * Owner-drawn, animated Win32 widgets: standard buttons, image buttons and
 * radio buttons whose visual-state changes are driven by storyboards on an
 * animation clock.
 *
 * The widget core, the animation engine, the layout math and the styling
 * value objects are platform-agnostic and compile and test on every target.
 * The Win32 backends (GDI drawing, window subclassing, the window host) are
 * compiled only on Windows.
 */
pub mod animation;
#[cfg(target_os = "windows")]
pub mod app;
#[cfg(target_os = "windows")]
pub mod controls;
pub mod error;
pub mod layout;
pub mod styling_primitives;
#[cfg(target_os = "windows")]
pub mod styling_windows;
pub mod types;
pub mod widgets;

pub use animation::{
    AnimationClockService, ManualTimeSource, SoftwareAnimationManager, SystemTimeSource,
    TimeSource, TransitionLibrary,
};
#[cfg(target_os = "windows")]
pub use app::Win32Widgets;
pub use error::{PlatformError, Result as PlatformResult};
pub use layout::{ScrollMetrics, ScrollThumb, VerticalFlow};
pub use styling_primitives::{Color, ColorValue, FontDescription, FontWeight, ImageRef};
pub use types::{ControlKind, Point, Rect, Size, TimerId, WidgetId, WindowHandle};
pub use widgets::{
    AnimatedWidget, ButtonPaletteConfig, ImageButton, ImageButtonConfig,
    ImageButtonPaletteConfig, RadioButton, RadioGroupCoordinator, RadioPaletteConfig,
    StandardButton, WidgetToolkit,
};
