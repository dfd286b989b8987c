/*
 * Facade that wires one animation manager, a window host and an interceptor
 * registry to the three widget kinds. Applications configure the palettes once
 * at startup and then attach widgets to existing windows.
 */

use crate::animation::{SoftwareAnimationManager, TimeSource};
use crate::error::Result;
use crate::types::WindowHandle;
use crate::widgets::animated::AnimatedWidget;
use crate::widgets::button::{ButtonKind, ButtonPaletteConfig, StandardButton};
use crate::widgets::context::{AnimationServices, SharedWidgetContext};
use crate::widgets::host::WindowHost;
use crate::widgets::image_button::{
    ImageButton, ImageButtonConfig, ImageButtonKind, ImageButtonPaletteConfig,
};
use crate::widgets::interceptor::InterceptorRegistry;
use crate::widgets::radio_button::{RadioButton, RadioKind, RadioPaletteConfig};
use crate::widgets::radio_group::RadioGroupCoordinator;

use std::cell::RefCell;
use std::rc::Rc;

pub struct WidgetToolkit {
    manager: Rc<SoftwareAnimationManager>,
    host: Rc<dyn WindowHost>,
    registry: Rc<dyn InterceptorRegistry>,
    buttons: Rc<SharedWidgetContext<ButtonKind>>,
    image_buttons: Rc<SharedWidgetContext<ImageButtonKind>>,
    radio_buttons: Rc<SharedWidgetContext<RadioKind>>,
}

impl WidgetToolkit {
    pub fn new(
        time_source: Rc<dyn TimeSource>,
        host: Rc<dyn WindowHost>,
        registry: Rc<dyn InterceptorRegistry>,
    ) -> Result<Self> {
        let manager = Rc::new(SoftwareAnimationManager::new(time_source));
        let services = AnimationServices::from_manager(manager.clone());

        let buttons = Rc::new(SharedWidgetContext::new());
        let image_buttons = Rc::new(SharedWidgetContext::new());
        let radio_buttons = Rc::new(SharedWidgetContext::new());
        buttons.initialize_shared_services(services.clone())?;
        image_buttons.initialize_shared_services(services.clone())?;
        radio_buttons.initialize_shared_services(services)?;
        log::info!("WidgetToolkit: animation services ready");

        Ok(Self {
            manager,
            host,
            registry,
            buttons,
            image_buttons,
            radio_buttons,
        })
    }

    pub fn configure_button_palette(&self, config: &ButtonPaletteConfig) -> Result<()> {
        self.buttons.set_shared_palette(config)
    }

    pub fn configure_image_button_palette(&self, config: &ImageButtonPaletteConfig) -> Result<()> {
        self.image_buttons.set_shared_palette(config)
    }

    pub fn configure_radio_palette(&self, config: &RadioPaletteConfig) -> Result<()> {
        self.radio_buttons.set_shared_palette(config)
    }

    pub fn attach_button(&self, handle: WindowHandle) -> Result<Rc<RefCell<StandardButton>>> {
        AnimatedWidget::attach(&self.buttons, self.host.clone(), &*self.registry, handle, ())
    }

    pub fn attach_image_button(
        &self,
        handle: WindowHandle,
        config: ImageButtonConfig,
    ) -> Result<Rc<RefCell<ImageButton>>> {
        AnimatedWidget::attach(
            &self.image_buttons,
            self.host.clone(),
            &*self.registry,
            handle,
            config,
        )
    }

    pub fn attach_radio_button(&self, handle: WindowHandle) -> Result<Rc<RefCell<RadioButton>>> {
        AnimatedWidget::attach(
            &self.radio_buttons,
            self.host.clone(),
            &*self.registry,
            handle,
            (),
        )
    }

    pub fn create_radio_group(&self) -> Rc<RadioGroupCoordinator> {
        RadioGroupCoordinator::new()
    }

    pub fn animation_manager(&self) -> &Rc<SoftwareAnimationManager> {
        &self.manager
    }

    pub fn registry(&self) -> &Rc<dyn InterceptorRegistry> {
        &self.registry
    }

    /*
     * Tears the animation manager down. Widgets still alive afterwards no
     * longer animate and drop without touching the manager.
     */
    pub fn shutdown(&self) {
        log::info!(
            "WidgetToolkit: shutting down ({} animation variable(s) live)",
            self.manager.variable_count()
        );
        self.manager.shutdown();
    }
}
