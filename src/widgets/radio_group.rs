/*
 * Keeps at most one radio button of a group selected. Members are held weakly
 * so the group never keeps a destroyed window's widget alive; each member holds
 * a weak reference back so a click can ask the group to update its siblings.
 */

use crate::error::{PlatformError, Result};
use crate::types::{WidgetId, WindowHandle};
use crate::widgets::animated::GroupMembership;
use crate::widgets::radio_button::RadioButton;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

struct GroupMember {
    handle: WindowHandle,
    widget: Weak<RefCell<RadioButton>>,
}

pub struct RadioGroupCoordinator {
    members: RefCell<BTreeMap<WidgetId, GroupMember>>,
    this: Weak<RadioGroupCoordinator>,
}

impl RadioGroupCoordinator {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            members: RefCell::new(BTreeMap::new()),
            this: this.clone(),
        })
    }

    pub fn add(&self, widget: &Rc<RefCell<RadioButton>>, id: WidgetId) -> Result<()> {
        let mut radio = widget.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed(format!("radio {id:?} is busy and cannot join a group"))
        })?;
        let handle = radio.handle();
        if handle.is_invalid() {
            return Err(PlatformError::InvalidHandle(format!(
                "radio {id:?} has no window"
            )));
        }
        if radio.group_id().is_some() {
            return Err(PlatformError::AlreadyInitialized(format!(
                "radio {handle} already belongs to a group"
            )));
        }
        let mut members = self.members.borrow_mut();
        if members.contains_key(&id) {
            log::warn!("RadioGroup: duplicate member id {id:?}");
            return Err(PlatformError::AlreadyInitialized(format!(
                "group already has a member with id {}",
                id.raw()
            )));
        }
        members.insert(
            id,
            GroupMember {
                handle,
                widget: Rc::downgrade(widget),
            },
        );
        radio.set_membership(Some(GroupMembership {
            group: self.this.clone(),
            id,
        }));
        log::debug!("RadioGroup: added {handle} as {id:?}");
        Ok(())
    }

    pub fn remove(&self, id: WidgetId) -> Result<()> {
        let member = self.members.borrow_mut().remove(&id).ok_or_else(|| {
            log::warn!("RadioGroup: remove of unknown member {id:?}");
            PlatformError::UnknownMember(id.raw())
        })?;
        if let Some(widget) = member.widget.upgrade()
            && let Ok(mut radio) = widget.try_borrow_mut()
        {
            radio.set_membership(None);
        }
        log::debug!("RadioGroup: removed {} ({id:?})", member.handle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.members.borrow().contains_key(&id)
    }

    /// The first selected live member, in id order.
    pub fn current_selection(&self) -> Option<WidgetId> {
        self.members
            .borrow()
            .iter()
            .find(|(_, member)| {
                member
                    .widget
                    .upgrade()
                    .and_then(|widget| widget.try_borrow().ok().map(|radio| radio.is_selected()))
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
    }

    /*
     * Selects member `id` and deselects every other member. An unknown id is
     * an error and changes nothing. Members whose widget is gone are skipped;
     * a member that fails to update does not stop the others, and the first
     * failure is returned.
     */
    pub fn select(&self, id: WidgetId) -> Result<()> {
        let targets: Vec<(WidgetId, Weak<RefCell<RadioButton>>)> = {
            let members = self.members.borrow();
            if !members.contains_key(&id) {
                log::error!("RadioGroup: select of unknown member {id:?}");
                return Err(PlatformError::UnknownMember(id.raw()));
            }
            members
                .iter()
                .map(|(member_id, member)| (*member_id, member.widget.clone()))
                .collect()
        };

        let mut first_error = None;
        for (member_id, widget) in targets {
            let Some(widget) = widget.upgrade() else {
                log::debug!("RadioGroup: member {member_id:?} no longer exists");
                continue;
            };
            let result = match widget.try_borrow_mut() {
                Ok(mut radio) => radio.update_selection_state(member_id == id),
                Err(_) => Err(PlatformError::OperationFailed(format!(
                    "radio {member_id:?} is busy"
                ))),
            };
            if let Err(e) = result {
                log::error!("RadioGroup: updating {member_id:?} failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        log::debug!("RadioGroup: selected {id:?}");
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for RadioGroupCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.borrow();
        f.debug_struct("RadioGroupCoordinator")
            .field("members", &members.keys().collect::<Vec<_>>())
            .finish()
    }
}
