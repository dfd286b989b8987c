/*
 * Per-kind shared state: the animation services and the validated palette.
 * Both are set once during startup and read by every widget of the kind.
 */

use crate::animation::{
    AnimationClockService, SoftwareAnimationManager, TransitionLibrary,
};
use crate::error::{PlatformError, Result};
use crate::widgets::kind::WidgetKind;

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Handles to the clock service and transition library a toolkit animates with.
#[derive(Clone)]
pub struct AnimationServices {
    pub clock: Rc<dyn AnimationClockService>,
    pub transitions: Rc<dyn TransitionLibrary>,
}

impl AnimationServices {
    pub fn from_manager(manager: Rc<SoftwareAnimationManager>) -> Self {
        Self {
            clock: manager.clone(),
            transitions: manager,
        }
    }
}

impl fmt::Debug for AnimationServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationServices")
            .field("shut_down", &self.clock.is_shut_down())
            .finish()
    }
}

pub struct SharedWidgetContext<K: WidgetKind> {
    services: OnceCell<AnimationServices>,
    palette: OnceCell<K::Palette>,
}

impl<K: WidgetKind> SharedWidgetContext<K> {
    pub fn new() -> Self {
        Self {
            services: OnceCell::new(),
            palette: OnceCell::new(),
        }
    }

    /// Stores the animation services. Only the first call succeeds.
    pub fn initialize_shared_services(&self, services: AnimationServices) -> Result<()> {
        if services.clock.is_shut_down() {
            log::error!("{}: refusing a clock service that has been shut down", K::KIND);
            return Err(PlatformError::NotReady(format!(
                "{} animation services are shut down",
                K::KIND
            )));
        }
        self.services.set(services).map_err(|_| {
            log::warn!("{}: shared animation services already initialized", K::KIND);
            PlatformError::AlreadyInitialized(format!(
                "{} animation services are already set",
                K::KIND
            ))
        })?;
        log::debug!("{}: shared animation services initialized", K::KIND);
        Ok(())
    }

    /*
     * Validates `config` into the shared palette. Only the first successful
     * call takes effect; a rejected config leaves the context unconfigured so a
     * corrected config can still be applied.
     */
    pub fn set_shared_palette(&self, config: &K::PaletteConfig) -> Result<()> {
        if self.palette.get().is_some() {
            log::warn!("{}: shared palette already set", K::KIND);
            return Err(PlatformError::AlreadyInitialized(format!(
                "{} palette is already set",
                K::KIND
            )));
        }
        let palette = K::build_palette(config).inspect_err(|e| {
            log::error!("{}: rejected palette config: {e}", K::KIND);
        })?;
        self.palette.set(palette).map_err(|_| {
            PlatformError::AlreadyInitialized(format!("{} palette is already set", K::KIND))
        })?;
        log::debug!("{}: shared palette configured", K::KIND);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.services.get().is_some() && self.palette.get().is_some()
    }

    pub fn services(&self) -> Result<&AnimationServices> {
        self.services.get().ok_or_else(|| {
            PlatformError::NotReady(format!("{} animation services are not initialized", K::KIND))
        })
    }

    pub fn palette(&self) -> Result<&K::Palette> {
        self.palette
            .get()
            .ok_or_else(|| PlatformError::NotReady(format!("{} palette is not set", K::KIND)))
    }
}

impl<K: WidgetKind> Default for SharedWidgetContext<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::button::{ButtonKind, ButtonPaletteConfig};
    use crate::widgets::test_support::Fixture;

    #[test]
    fn services_can_only_be_set_once() {
        let fixture = Fixture::new();
        let context = SharedWidgetContext::<ButtonKind>::new();
        assert!(!context.is_ready());
        context.initialize_shared_services(fixture.services()).unwrap();
        assert!(matches!(
            context.initialize_shared_services(fixture.services()),
            Err(PlatformError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn shut_down_clock_is_refused() {
        let fixture = Fixture::new();
        fixture.clock.shutdown();
        let context = SharedWidgetContext::<ButtonKind>::new();
        assert!(matches!(
            context.initialize_shared_services(fixture.services()),
            Err(PlatformError::NotReady(_))
        ));
    }

    #[test]
    fn rejected_palette_leaves_context_unconfigured() {
        let fixture = Fixture::new();
        let context = SharedWidgetContext::<ButtonKind>::new();
        context.initialize_shared_services(fixture.services()).unwrap();

        let incomplete = ButtonPaletteConfig {
            hover_colors: None,
            ..ButtonPaletteConfig::dark()
        };
        assert!(matches!(
            context.set_shared_palette(&incomplete),
            Err(PlatformError::InvalidConfiguration(_))
        ));
        assert!(!context.is_ready());
        assert!(matches!(context.palette(), Err(PlatformError::NotReady(_))));

        context
            .set_shared_palette(&ButtonPaletteConfig::dark())
            .unwrap();
        assert!(context.is_ready());
        assert!(matches!(
            context.set_shared_palette(&ButtonPaletteConfig::dark()),
            Err(PlatformError::AlreadyInitialized(_))
        ));
    }
}
