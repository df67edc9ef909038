//! Parameter panel presentation model.
//!
//! The panel holds everything a front-end needs to draw the parameter table:
//! formatted text buffers, fit checkboxes, and slider positions. It never owns
//! parameter state; it subscribes to the [`ParameterStore`] and re-renders rows
//! from the store on every notification, so any buffer the user typed into is
//! overwritten with the authoritative (possibly clamped) value.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::domain::{Bound, ClampNotice, Parameter, ValueFormat};
use crate::error::ParamError;
use crate::params::slider::SliderQuantizer;
use crate::params::store::{ParamEvent, ParameterStore, SubscriptionId};

/// Editable text columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Val,
    Min,
    Max,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Val => Field::Min,
            Field::Min => Field::Max,
            Field::Max => Field::Val,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Val => "val",
            Field::Min => "min",
            Field::Max => "max",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelRow {
    pub name: String,
    pub format: ValueFormat,
    pub val_text: String,
    pub min_text: String,
    pub max_text: String,
    /// Fit checkbox; checked means the parameter is thawed.
    pub thawed: bool,
    /// `None` while the bounds are degenerate.
    pub slider: Option<SliderQuantizer>,
    pub position: u8,
}

impl PanelRow {
    fn from_param(param: &Parameter) -> Self {
        let mut row = Self {
            name: param.full_name.clone(),
            format: ValueFormat::parse_or_default(&param.fmt),
            val_text: String::new(),
            min_text: String::new(),
            max_text: String::new(),
            thawed: !param.frozen,
            slider: None,
            position: 0,
        };
        row.attach_slider(param);
        row.sync(param);
        row
    }

    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Val => &self.val_text,
            Field::Min => &self.min_text,
            Field::Max => &self.max_text,
        }
    }

    pub fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Val => &mut self.val_text,
            Field::Min => &mut self.min_text,
            Field::Max => &mut self.max_text,
        }
    }

    fn attach_slider(&mut self, param: &Parameter) {
        let result = match self.slider.as_mut() {
            Some(slider) => slider.rescale(param.min, param.max),
            None => SliderQuantizer::for_param(param).map(|q| {
                self.slider = Some(q);
            }),
        };
        if let Err(err) = result {
            if self.slider.take().is_some() {
                warn!(param = %param.full_name, "slider detached: {err}");
            }
        }
    }

    fn sync_value(&mut self, param: &Parameter) {
        self.val_text = self.format.render(param.val);
        if let Some(slider) = &self.slider {
            self.position = slider.to_position(param.val);
        }
    }

    fn sync(&mut self, param: &Parameter) {
        self.format = ValueFormat::parse_or_default(&param.fmt);
        self.min_text = self.format.render(param.min);
        self.max_text = self.format.render(param.max);
        self.thawed = !param.frozen;
        self.sync_value(param);
    }
}

#[derive(Debug, Default)]
pub struct ParamPanel {
    rows: Vec<PanelRow>,
    revision: u64,
    last_clamp: Option<(usize, ClampNotice)>,
}

impl ParamPanel {
    pub fn new(params: &[Parameter]) -> Self {
        Self {
            rows: params.iter().map(PanelRow::from_param).collect(),
            revision: 0,
            last_clamp: None,
        }
    }

    /// Build a panel for `store` and subscribe it to store notifications.
    pub fn attach(store: &mut ParameterStore) -> (Rc<RefCell<ParamPanel>>, SubscriptionId) {
        let panel = Rc::new(RefCell::new(ParamPanel::new(store.params())));
        let sink = Rc::clone(&panel);
        let id = store.subscribe(Box::new(move |event: &ParamEvent<'_>| {
            sink.borrow_mut().apply(event);
        }));
        (panel, id)
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&PanelRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bumped on every applied notification; views compare it to decide
    /// whether plots need redrawing.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The most recent clamp correction, cleared on read.
    pub fn take_clamp(&mut self) -> Option<(usize, ClampNotice)> {
        self.last_clamp.take()
    }

    /// Overwrite a text buffer with raw user input before it is committed.
    pub fn set_buffer(&mut self, index: usize, field: Field, text: &str) {
        if let Some(row) = self.rows.get_mut(index) {
            *row.text_mut(field) = text.to_string();
        }
    }

    /// Re-render a row from the store, discarding uncommitted input.
    pub fn resync(&mut self, index: usize, param: &Parameter) {
        if let Some(row) = self.rows.get_mut(index) {
            row.sync(param);
        }
    }

    pub fn apply(&mut self, event: &ParamEvent<'_>) {
        match *event {
            ParamEvent::Value {
                index,
                param,
                clamp,
            } => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.sync_value(param);
                }
                if let Some(notice) = clamp {
                    self.last_clamp = Some((index, notice));
                }
            }
            ParamEvent::Bound { index, param, .. } => {
                if let Some(row) = self.rows.get_mut(index) {
                    // Rescale before repositioning; a stale mapping would
                    // misplace the slider and corrupt the next drag.
                    row.attach_slider(param);
                    row.sync(param);
                }
            }
            ParamEvent::Frozen { index, param } => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.thawed = !param.frozen;
                }
            }
            ParamEvent::Bulk { params } => {
                for (row, param) in self.rows.iter_mut().zip(params) {
                    row.attach_slider(param);
                    row.sync(param);
                }
            }
        }
        self.revision += 1;
    }
}

/// Result of committing a text buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    /// The value was written through the store.
    Applied(Option<ClampNotice>),
    /// The buffer did not parse as a number; it was restored from the store.
    Ignored,
}

fn row_param(store: &ParameterStore, index: usize) -> Result<&Parameter, ParamError> {
    store
        .get_index(index)
        .ok_or_else(|| ParamError::UnknownParameter(format!("row {index}")))
}

/// Commit typed text for `field` of row `index` through the store.
pub fn edit_text(
    panel: &RefCell<ParamPanel>,
    store: &mut ParameterStore,
    index: usize,
    field: Field,
    text: &str,
) -> Result<EditOutcome, ParamError> {
    row_param(store, index)?;
    panel.borrow_mut().set_buffer(index, field, text);

    // `nan` and `inf` parse as f64 but are not usable values or bounds.
    let Some(value) = text.trim().parse::<f64>().ok().filter(|v| v.is_finite()) else {
        let param = row_param(store, index)?;
        panel.borrow_mut().resync(index, param);
        return Ok(EditOutcome::Ignored);
    };

    let clamp = match field {
        Field::Val => store.set_value_at(index, value),
        Field::Min => {
            store.set_bound_at(index, Bound::Min, value);
            None
        }
        Field::Max => {
            store.set_bound_at(index, Bound::Max, value);
            None
        }
    };
    Ok(EditOutcome::Applied(clamp))
}

/// Move the slider of row `index` to `position` and write the mapped value.
pub fn drag_slider(
    panel: &RefCell<ParamPanel>,
    store: &mut ParameterStore,
    index: usize,
    position: u8,
) -> Result<Option<ClampNotice>, ParamError> {
    let param = row_param(store, index)?;
    let slider = panel
        .borrow()
        .row(index)
        .and_then(|row| row.slider)
        .ok_or(ParamError::DegenerateRange {
            min: param.min,
            max: param.max,
        })?;
    Ok(store.set_value_at(index, slider.to_value(position)))
}

/// Move the slider of row `index` by `steps` positions.
pub fn nudge_slider(
    panel: &RefCell<ParamPanel>,
    store: &mut ParameterStore,
    index: usize,
    steps: i32,
) -> Result<Option<ClampNotice>, ParamError> {
    let current = panel.borrow().row(index).map(|row| row.position).unwrap_or(0);
    drag_slider(panel, store, index, SliderQuantizer::step(current, steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ParameterStore, Rc<RefCell<ParamPanel>>) {
        let mut store = ParameterStore::new(vec![
            Parameter::new("a", 5.0, 0.0, 10.0).with_fmt("{:.2f}"),
            Parameter::new("b", 1.0, 1.0, 1.0),
        ]);
        let (panel, _) = ParamPanel::attach(&mut store);
        (store, panel)
    }

    #[test]
    fn initial_rows_render_from_store() {
        let (_, panel) = setup();
        let p = panel.borrow();
        let a = p.row(0).unwrap();
        assert_eq!(a.val_text, "5.00");
        assert_eq!(a.min_text, "0.00");
        assert_eq!(a.position, 50);
        assert!(a.thawed);
        assert!(p.row(1).unwrap().slider.is_none());
    }

    #[test]
    fn clamped_text_edit_overwrites_buffer() {
        let (mut store, panel) = setup();
        let outcome = edit_text(&panel, &mut store, 0, Field::Val, "42").unwrap();
        assert!(matches!(outcome, EditOutcome::Applied(Some(ClampNotice::ToMax { .. }))));
        assert_eq!(store.params()[0].val, 10.0);
        let p = panel.borrow();
        assert_eq!(p.row(0).unwrap().val_text, "10.00");
        assert_eq!(p.row(0).unwrap().position, 100);
    }

    #[test]
    fn unparseable_edit_restores_buffer() {
        let (mut store, panel) = setup();
        let outcome = edit_text(&panel, &mut store, 0, Field::Val, "abc").unwrap();
        assert_eq!(outcome, EditOutcome::Ignored);
        assert_eq!(panel.borrow().row(0).unwrap().val_text, "5.00");
        assert_eq!(store.params()[0].val, 5.0);
    }

    #[test]
    fn non_finite_edit_is_ignored() {
        let (mut store, panel) = setup();
        for (field, text) in [(Field::Val, "nan"), (Field::Val, "inf"), (Field::Min, "-inf"), (Field::Max, "NaN")] {
            let outcome = edit_text(&panel, &mut store, 0, field, text).unwrap();
            assert_eq!(outcome, EditOutcome::Ignored, "{text}");
        }
        let p = &store.params()[0];
        assert_eq!((p.val, p.min, p.max), (5.0, 0.0, 10.0));
        let panel = panel.borrow();
        let row = panel.row(0).unwrap();
        assert_eq!(row.val_text, "5.00");
        assert_eq!(row.max_text, "10.00");
    }

    #[test]
    fn bound_edit_rescales_slider_before_repositioning() {
        let (mut store, panel) = setup();
        edit_text(&panel, &mut store, 0, Field::Max, "20").unwrap();
        {
            let p = panel.borrow();
            let row = p.row(0).unwrap();
            assert_eq!(row.max_text, "20.00");
            assert_eq!(row.position, 25);
        }

        drag_slider(&panel, &mut store, 0, 50).unwrap();
        assert!((store.params()[0].val - 10.0).abs() < 1e-9);
        assert_eq!(panel.borrow().row(0).unwrap().val_text, "10.00");
    }

    #[test]
    fn degenerate_bounds_detach_and_reattach_slider() {
        let (mut store, panel) = setup();
        assert!(matches!(
            drag_slider(&panel, &mut store, 1, 10),
            Err(ParamError::DegenerateRange { .. })
        ));

        edit_text(&panel, &mut store, 1, Field::Max, "3").unwrap();
        assert!(panel.borrow().row(1).unwrap().slider.is_some());
        assert_eq!(panel.borrow().row(1).unwrap().position, 0);

        edit_text(&panel, &mut store, 1, Field::Max, "1").unwrap();
        assert!(panel.borrow().row(1).unwrap().slider.is_none());

        edit_text(&panel, &mut store, 1, Field::Max, "3").unwrap();
        edit_text(&panel, &mut store, 1, Field::Max, "0.5").unwrap();
        assert!(panel.borrow().row(1).unwrap().slider.is_none());
    }

    #[test]
    fn bulk_update_refreshes_every_row() {
        let (mut store, panel) = setup();
        let before = panel.borrow().revision();
        store.bulk_update(&[7.5, 1.0]).unwrap();
        let p = panel.borrow();
        assert_eq!(p.row(0).unwrap().val_text, "7.50");
        assert_eq!(p.row(0).unwrap().position, 75);
        assert!(p.revision() > before);
    }

    #[test]
    fn nudge_moves_by_steps() {
        let (mut store, panel) = setup();
        nudge_slider(&panel, &mut store, 0, 10).unwrap();
        assert!((store.params()[0].val - 6.0).abs() < 1e-9);
        nudge_slider(&panel, &mut store, 0, 100).unwrap();
        assert!((store.params()[0].val - 10.0).abs() < 1e-9);
    }

    #[test]
    fn freeze_toggles_checkbox() {
        let (mut store, panel) = setup();
        store.set_frozen("a", true).unwrap();
        assert!(!panel.borrow().row(0).unwrap().thawed);
    }
}
