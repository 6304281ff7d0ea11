//! Touch event sources.
//!
//! `EvdevTouchSource` decodes the kernel multi-touch slot protocol: the
//! device multiplexes all contacts over one stream, selecting the current
//! slot with ABS_MT_SLOT, marking contact lifetimes with ABS_MT_TRACKING_ID
//! (-1 = lifted), and reporting positions with ABS_MT_POSITION_X/Y. A
//! SYN_REPORT closes each frame of updates.

use crate::error::{Error, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use evdev::{AbsoluteAxisType, Device, EventType, InputEvent};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use std::io::IsTerminal;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use tracing::debug;

/// A decoded touch contact event, coordinates already in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchEvent {
    Down { slot: usize, x: f64, y: f64 },
    Motion { slot: usize, x: f64, y: f64 },
    Up { slot: usize },
}

/// Anything that can be polled for a batch of touch events.
///
/// `WouldBlock` means no events are ready; any other error is fatal to the
/// dispatch loop.
pub trait TouchEventSource {
    fn poll_events(&mut self) -> std::io::Result<Vec<TouchEvent>>;
}

#[derive(Clone, Copy, Debug)]
struct AxisRange {
    min: f64,
    span: f64,
}

impl AxisRange {
    fn new(minimum: i32, maximum: i32) -> Self {
        Self {
            min: minimum as f64,
            span: (maximum - minimum) as f64,
        }
    }

    fn transform(&self, raw: i32, screen: f64) -> f64 {
        if self.span <= 0.0 {
            return raw as f64;
        }
        (raw as f64 - self.min) / self.span * screen
    }
}

/// Raw per-slot state retained across frames. Motion frames may update only
/// one axis, so the last known value of the other must be kept.
#[derive(Clone, Copy, Debug, Default)]
struct RawSlot {
    x: i32,
    y: i32,
    down: bool,
    moved: bool,
    lifted: bool,
}

/// Translates raw evdev multi-touch events into screen-space `TouchEvent`s.
/// Pure state machine, no device I/O.
struct MtDecoder {
    screen_width: f64,
    screen_height: f64,
    x_axis: AxisRange,
    y_axis: AxisRange,
    current_slot: usize,
    slots: Vec<RawSlot>,
}

impl MtDecoder {
    fn new(screen_width: f64, screen_height: f64, x_axis: AxisRange, y_axis: AxisRange) -> Self {
        Self {
            screen_width,
            screen_height,
            x_axis,
            y_axis,
            current_slot: 0,
            slots: Vec::new(),
        }
    }

    fn slot_mut(&mut self, slot: usize) -> &mut RawSlot {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, RawSlot::default());
        }
        &mut self.slots[slot]
    }

    fn handle(&mut self, event: &InputEvent, out: &mut Vec<TouchEvent>) {
        if event.event_type() == EventType::ABSOLUTE {
            let axis = AbsoluteAxisType(event.code());
            let value = event.value();
            let slot = self.current_slot;
            if axis == AbsoluteAxisType::ABS_MT_SLOT {
                self.current_slot = value.max(0) as usize;
            } else if axis == AbsoluteAxisType::ABS_MT_TRACKING_ID {
                if value < 0 {
                    self.slot_mut(slot).lifted = true;
                } else {
                    self.slot_mut(slot).down = true;
                }
            } else if axis == AbsoluteAxisType::ABS_MT_POSITION_X {
                let state = self.slot_mut(slot);
                state.x = value;
                state.moved = true;
            } else if axis == AbsoluteAxisType::ABS_MT_POSITION_Y {
                let state = self.slot_mut(slot);
                state.y = value;
                state.moved = true;
            }
        } else if event.event_type() == EventType::SYNCHRONIZATION && event.code() == 0 {
            // SYN_REPORT closes the frame; other sync codes are not frame
            // boundaries.
            self.flush_frame(out);
        }
    }

    /// Emit the events for one completed SYN frame and clear the per-frame
    /// flags. A new contact's first position arrives as part of its Down,
    /// never as a separate Motion.
    fn flush_frame(&mut self, out: &mut Vec<TouchEvent>) {
        for slot in 0..self.slots.len() {
            let state = self.slots[slot];
            let x = self.x_axis.transform(state.x, self.screen_width);
            let y = self.y_axis.transform(state.y, self.screen_height);

            if state.down {
                out.push(TouchEvent::Down { slot, x, y });
            } else if state.moved && !state.lifted {
                out.push(TouchEvent::Motion { slot, x, y });
            }
            if state.lifted {
                out.push(TouchEvent::Up { slot });
            }

            let state = &mut self.slots[slot];
            state.down = false;
            state.moved = false;
            state.lifted = false;
        }
    }
}

pub struct EvdevTouchSource {
    device: Device,
    decoder: MtDecoder,
}

impl EvdevTouchSource {
    /// Wrap an opened evdev device, switching it to non-blocking reads.
    ///
    /// `screen_width`/`screen_height` define the space raw axis values are
    /// transformed into, using the axis ranges the device reports.
    pub fn new(device: Device, screen_width: u32, screen_height: u32) -> Result<Self> {
        set_nonblocking(&device)?;

        let has_mt_axes = device
            .supported_absolute_axes()
            .map(|axes| {
                axes.contains(AbsoluteAxisType::ABS_MT_POSITION_X)
                    && axes.contains(AbsoluteAxisType::ABS_MT_POSITION_Y)
            })
            .unwrap_or(false);
        if !has_mt_axes {
            return Err(Error::NotMultiTouch);
        }

        // Axis state is indexed by the raw axis code.
        let abs_state = device.get_abs_state()?;
        let x_info = abs_state[AbsoluteAxisType::ABS_MT_POSITION_X.0 as usize];
        let y_info = abs_state[AbsoluteAxisType::ABS_MT_POSITION_Y.0 as usize];
        let x_axis = AxisRange::new(x_info.minimum, x_info.maximum);
        let y_axis = AxisRange::new(y_info.minimum, y_info.maximum);

        debug!(
            x_min = x_axis.min,
            x_span = x_axis.span,
            y_min = y_axis.min,
            y_span = y_axis.span,
            "touch axis ranges"
        );

        Ok(Self {
            device,
            decoder: MtDecoder::new(screen_width as f64, screen_height as f64, x_axis, y_axis),
        })
    }
}

impl TouchEventSource for EvdevTouchSource {
    fn poll_events(&mut self) -> std::io::Result<Vec<TouchEvent>> {
        let mut out = Vec::new();
        let events = match self.device.fetch_events() {
            Ok(events) => events,
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                return Ok(out);
            }
            Err(err) => return Err(err),
        };

        let raw: Vec<InputEvent> = events.collect();
        for event in &raw {
            self.decoder.handle(event, &mut out);
        }
        Ok(out)
    }
}

fn set_nonblocking(device: &Device) -> std::io::Result<()> {
    let flags = OFlag::from_bits_truncate(fcntl(device.as_raw_fd(), FcntlArg::F_GETFL)?);
    let new_flags = flags | OFlag::O_NONBLOCK;
    fcntl(device.as_raw_fd(), FcntlArg::F_SETFL(new_flags))?;
    Ok(())
}

/// Enumerate evdev devices that speak the multi-touch slot protocol.
pub fn list_touch_devices() -> Vec<(PathBuf, Device)> {
    let mut devices: Vec<_> = evdev::enumerate().collect();
    devices.retain(|(_, dev)| {
        dev.supported_absolute_axes()
            .map(|axes| axes.contains(AbsoluteAxisType::ABS_MT_SLOT))
            .unwrap_or(false)
    });
    devices
}

/// Open a touch device: the configured path when given, otherwise an
/// interactive picker over the multi-touch devices found on the system.
/// Returns the path alongside the device so callers can remember the choice.
pub fn open_touch_device(path: Option<&str>) -> Result<(PathBuf, Device)> {
    if let Some(path) = path {
        let device = Device::open(path).map_err(|source| Error::DeviceOpen {
            path: PathBuf::from(path),
            source,
        })?;
        return Ok((PathBuf::from(path), device));
    }

    let mut devices = list_touch_devices();
    if devices.is_empty() {
        return Err(Error::DeviceSelection(
            "no multi-touch devices found".to_string(),
        ));
    }
    if devices.len() == 1 {
        return Ok(devices.remove(0));
    }
    if !std::io::stdout().is_terminal() {
        return Err(Error::DeviceSelection(
            "not a terminal (pass --device or set it in the config)".to_string(),
        ));
    }

    let selections: Vec<String> = devices
        .iter()
        .map(|(p, d)| format!("{} ({})", d.name().unwrap_or("?"), p.display()))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select touch device")
        .items(&selections)
        .default(0)
        .interact()
        .map_err(|e| Error::DeviceSelection(e.to_string()))?;

    Ok(devices.remove(selection))
}
