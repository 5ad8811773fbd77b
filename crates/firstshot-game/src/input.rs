//! Input system with action-based mapping
//!
//! Raw device events (keys, mouse buttons, mouse motion) are translated into
//! a queue of [`InputEvent`]s carrying closed [`InputAction`] and
//! [`AnalogAxis`] values. Names are decoded once, when bindings are loaded;
//! gameplay code never compares strings.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Discrete game actions triggered by press/release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputAction {
    /// Strafe left (A by default)
    MoveLeft,
    /// Strafe right (D by default)
    MoveRight,
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Jump (Space by default)
    Jump,
    /// Run modifier (Left Shift by default)
    Run,
    /// Fire a projectile (left mouse button by default)
    Shoot,
}

impl InputAction {
    pub const ALL: [InputAction; 7] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::MoveForward,
        InputAction::MoveBackward,
        InputAction::Jump,
        InputAction::Run,
        InputAction::Shoot,
    ];

    /// Binding name used in settings files
    pub fn name(&self) -> &'static str {
        match self {
            InputAction::MoveLeft => "move-left",
            InputAction::MoveRight => "move-right",
            InputAction::MoveForward => "move-forward",
            InputAction::MoveBackward => "move-backward",
            InputAction::Jump => "jump",
            InputAction::Run => "run",
            InputAction::Shoot => "shoot",
        }
    }

    /// Decode a binding name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// Continuous look axes fed by mouse motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalogAxis {
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
}

impl AnalogAxis {
    pub const ALL: [AnalogAxis; 4] = [
        AnalogAxis::RotateLeft,
        AnalogAxis::RotateRight,
        AnalogAxis::RotateUp,
        AnalogAxis::RotateDown,
    ];

    /// Axis name used in settings files
    pub fn name(&self) -> &'static str {
        match self {
            AnalogAxis::RotateLeft => "rotate-left",
            AnalogAxis::RotateRight => "rotate-right",
            AnalogAxis::RotateUp => "rotate-up",
            AnalogAxis::RotateDown => "rotate-down",
        }
    }

    /// Decode an axis name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.name() == name)
    }
}

/// A decoded input event, delivered to gameplay in arrival order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A discrete action changed state
    Action { action: InputAction, pressed: bool },
    /// A look axis moved by a non-negative magnitude
    Analog { axis: AnalogAxis, value: f32 },
}

/// Binding of a physical key or button to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

/// Mouse motion axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAxis {
    X,
    Y,
}

/// One signed half of a mouse axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisTrigger {
    pub axis: MouseAxis,
    /// Triggered by negative deltas when true, positive when false
    pub negative: bool,
}

impl AxisTrigger {
    pub const fn new(axis: MouseAxis, negative: bool) -> Self {
        Self { axis, negative }
    }
}

/// Binding overrides loaded from settings, keyed by action name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingTable {
    /// Action name to keyboard key, e.g. `move-forward = "KeyW"`
    #[serde(default)]
    pub keys: BTreeMap<String, KeyCode>,
    /// Action name to mouse button index
    #[serde(default)]
    pub mouse_buttons: BTreeMap<String, u32>,
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Analog value produced per pixel of mouse motion
    pub axis_scale: f32,
    /// Binding overrides applied on top of the defaults
    pub bindings: BindingTable,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            axis_scale: 1.0 / 1024.0,
            bindings: BindingTable::default(),
        }
    }
}

/// Maps physical inputs to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
    /// Mouse axis halves to look axes
    axes: HashMap<AxisTrigger, AnalogAxis>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();

        // Default WASD bindings
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);
        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);

        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Run);
        bindings.bind_mouse(0, InputAction::Shoot);

        // Screen-space Y grows downward, so negative Y looks up
        bindings.bind_axis(AxisTrigger::new(MouseAxis::X, true), AnalogAxis::RotateLeft);
        bindings.bind_axis(AxisTrigger::new(MouseAxis::X, false), AnalogAxis::RotateRight);
        bindings.bind_axis(AxisTrigger::new(MouseAxis::Y, true), AnalogAxis::RotateUp);
        bindings.bind_axis(AxisTrigger::new(MouseAxis::Y, false), AnalogAxis::RotateDown);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with no bindings at all
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
            axes: HashMap::new(),
        }
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: InputAction) {
        self.insert(InputBinding::Mouse(button), action);
    }

    /// Bind one half of a mouse axis to a look axis
    pub fn bind_axis(&mut self, trigger: AxisTrigger, axis: AnalogAxis) {
        self.axes.insert(trigger, axis);
    }

    fn insert(&mut self, binding: InputBinding, action: InputAction) {
        if let Some(previous) = self.bindings.insert(binding, action) {
            if let Some(list) = self.reverse.get_mut(&previous) {
                list.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Remove every binding of an action
    pub fn unbind_action(&mut self, action: InputAction) {
        for binding in self.reverse.remove(&action).unwrap_or_default() {
            self.bindings.remove(&binding);
        }
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.get_action(&InputBinding::Key(key))
    }

    /// Get the look axis for a mouse axis half, if any
    pub fn get_axis(&self, trigger: &AxisTrigger) -> Option<AnalogAxis> {
        self.axes.get(trigger).copied()
    }

    /// All bindings of an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of button and axis bindings
    pub fn len(&self) -> usize {
        self.bindings.len() + self.axes.len()
    }

    /// Whether the table holds no bindings
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace bindings for every action named in the table.
    /// Unknown action names are logged and skipped.
    pub fn apply_overrides(&mut self, table: &BindingTable) {
        let mut replaced = HashSet::new();

        let keys = table
            .keys
            .iter()
            .map(|(name, key)| (name, InputBinding::Key(*key)));
        let buttons = table
            .mouse_buttons
            .iter()
            .map(|(name, button)| (name, InputBinding::Mouse(*button)));

        for (name, binding) in keys.chain(buttons) {
            let Some(action) = InputAction::from_name(name) else {
                warn!("Ignoring binding for unknown action '{}'", name);
                continue;
            };
            if replaced.insert(action) {
                self.unbind_action(action);
            }
            self.insert(binding, action);
        }
    }
}

/// Translates raw device events into queued [`InputEvent`]s while enabled
#[derive(Debug)]
pub struct InputMapper {
    /// The full binding table; registered on enable
    pub bindings: InputBindings,
    /// Analog value produced per pixel of mouse motion
    pub axis_scale: f32,
    /// Bindings currently registered (empty while disabled)
    registered: InputBindings,
    /// Buttons currently held, for key-repeat suppression
    held: HashSet<InputBinding>,
    /// Decoded events awaiting the next frame
    events: Vec<InputEvent>,
    enabled: bool,
    cursor_visible: bool,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(InputBindings::default(), InputConfig::default().axis_scale)
    }
}

impl InputMapper {
    /// Create a disabled mapper over a binding table
    pub fn new(bindings: InputBindings, axis_scale: f32) -> Self {
        Self {
            bindings,
            axis_scale,
            registered: InputBindings::empty(),
            held: HashSet::new(),
            events: Vec::new(),
            enabled: false,
            cursor_visible: true,
        }
    }

    /// Build a mapper from configuration (defaults plus overrides)
    pub fn from_config(config: &InputConfig) -> Self {
        let mut bindings = InputBindings::default();
        bindings.apply_overrides(&config.bindings);
        Self::new(bindings, config.axis_scale)
    }

    /// Register every binding and hide the cursor
    pub fn enable(&mut self) {
        self.registered = self.bindings.clone();
        self.enabled = true;
        self.cursor_visible = false;
        info!("Input enabled with {} bindings", self.registered.len());
    }

    /// Unregister every binding, drop held and queued state, show the cursor
    pub fn disable(&mut self) {
        self.registered = InputBindings::empty();
        self.held.clear();
        self.events.clear();
        self.enabled = false;
        self.cursor_visible = true;
        info!("Input disabled");
    }

    /// Whether bindings are registered
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the device cursor should be shown
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Number of registered bindings
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        match physical_key {
            PhysicalKey::Code(key_code) => {
                self.handle_button(InputBinding::Key(key_code), element_state)
            }
            PhysicalKey::Unidentified(code) => {
                trace!("Dropping unidentified key {:?}", code);
            }
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let button_id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };
        self.handle_button(InputBinding::Mouse(button_id), state);
    }

    fn handle_button(&mut self, binding: InputBinding, state: ElementState) {
        if !self.enabled {
            trace!("Input disabled, dropping {:?}", binding);
            return;
        }
        let Some(action) = self.registered.get_action(&binding) else {
            trace!("No binding for {:?}", binding);
            return;
        };

        match state {
            ElementState::Pressed => {
                // OS key repeat re-sends presses for held keys
                if self.held.insert(binding) {
                    self.events.push(InputEvent::Action {
                        action,
                        pressed: true,
                    });
                }
            }
            ElementState::Released => {
                self.held.remove(&binding);
                self.events.push(InputEvent::Action {
                    action,
                    pressed: false,
                });
            }
        }
    }

    /// Handle raw mouse motion in pixels
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.enabled {
            return;
        }
        self.push_axis(MouseAxis::X, delta.0 as f32);
        self.push_axis(MouseAxis::Y, delta.1 as f32);
    }

    fn push_axis(&mut self, axis: MouseAxis, delta: f32) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        let trigger = AxisTrigger::new(axis, delta < 0.0);
        if let Some(axis) = self.registered.get_axis(&trigger) {
            self.events.push(InputEvent::Analog {
                axis,
                value: delta.abs() * self.axis_scale,
            });
        }
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}
