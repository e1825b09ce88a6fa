// src/hal/native.rs
//! Native stimulator module binding
//!
//! The vendor proxy module is loaded once per process and never unloaded.
//! Concurrent first use serializes on the `OnceCell`; later requests reuse
//! the handle even if they name a different file.

use crate::config::constants::native::*;
use crate::hal::traits::{DeviceError, StimulatorDevice};
use crate::hal::types::{DeviceParameters, StatusCode};
use libloading::{Library, Symbol};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

type SetFn = unsafe extern "system" fn(i32, i32, i32, i32, i32, i32, i32, i32) -> i32;
type GetFn = unsafe extern "system" fn(
    *mut i32,
    *mut i32,
    *mut i32,
    *mut i32,
    *mut i32,
    *mut i32,
    *mut i32,
    *mut i32,
) -> i32;
type TriggerFn = unsafe extern "system" fn() -> i32;

static MODULE: OnceCell<NativeModule> = OnceCell::new();

/// Failure to locate, load or bind the native module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleLoadError {
    #[error("native module not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to load native module {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("native module does not export {symbol}: {reason}")]
    MissingSymbol { symbol: &'static str, reason: String },

    #[error("cannot determine native module location: {0}")]
    Unresolvable(String),
}

/// Loaded module with its three bound entry points
pub struct NativeModule {
    path: PathBuf,
    set: SetFn,
    get: GetFn,
    trigger: TriggerFn,
    // Keeps the function pointers above valid
    _library: Library,
}

impl std::fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeModule").field("path", &self.path).finish_non_exhaustive()
    }
}

impl NativeModule {
    /// Load `path` and bind the set/get/trigger symbols.
    ///
    /// This does not touch the process-wide handle; see [`global_module`].
    pub fn load(path: &Path) -> Result<Self, ModuleLoadError> {
        if !path.exists() {
            return Err(ModuleLoadError::NotFound { path: path.to_path_buf() });
        }

        // SAFETY: loading runs the module's initialisers. The vendor proxy is
        // trusted to the same degree as the hardware it drives.
        let library = unsafe { Library::new(path) }.map_err(|e| ModuleLoadError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let set = unsafe { bind::<SetFn>(&library, SET_SYMBOL)? };
        let get = unsafe { bind::<GetFn>(&library, GET_SYMBOL)? };
        let trigger = unsafe { bind::<TriggerFn>(&library, TRIGGER_SYMBOL)? };

        info!(path = %path.display(), "native stimulator module loaded");

        Ok(Self {
            path: path.to_path_buf(),
            set,
            get,
            trigger,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Copy a function pointer out of `library`.
///
/// # Safety
/// `T` must match the exported symbol's real signature, and the returned
/// pointer must not outlive `library`.
unsafe fn bind<T: Copy>(library: &Library, symbol: &'static str) -> Result<T, ModuleLoadError> {
    let bound: Symbol<T> = library
        .get(symbol.as_bytes())
        .map_err(|e| ModuleLoadError::MissingSymbol { symbol, reason: e.to_string() })?;
    Ok(*bound)
}

/// Pick the module file: explicit override, then `DS8R_MODULE_PATH`, then
/// `D128RProxy.dll` next to the running executable.
pub fn resolve_module_path(override_path: Option<&Path>) -> Result<PathBuf, ModuleLoadError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(MODULE_PATH_ENV_VAR).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe().map_err(|e| ModuleLoadError::Unresolvable(e.to_string()))?;
    let dir = exe
        .parent()
        .ok_or_else(|| ModuleLoadError::Unresolvable(format!("{} has no parent directory", exe.display())))?;
    Ok(dir.join(DEFAULT_MODULE_FILE_NAME))
}

/// Process-wide module handle, loading it on first use.
///
/// The requested location is resolved on every call, then compared with
/// the loaded module once the one-time load has settled.
pub fn global_module(override_path: Option<&Path>) -> Result<&'static NativeModule, ModuleLoadError> {
    let requested = match resolve_module_path(override_path) {
        Ok(path) => path,
        // An unresolvable request cannot conflict with a module already loaded
        Err(e) => return MODULE.get().ok_or(e),
    };

    let module = MODULE.get_or_try_init(|| {
        debug!(path = %requested.display(), "loading native stimulator module");
        NativeModule::load(&requested)
    })?;

    warn_if_relocated(module.path(), &requested);
    Ok(module)
}

/// Log when `requested` differs from the module already loaded. Returns
/// `true` if the request was ignored.
fn warn_if_relocated(loaded: &Path, requested: &Path) -> bool {
    if loaded == requested {
        return false;
    }
    warn!(
        requested = %requested.display(),
        loaded = %loaded.display(),
        "native module already loaded; ignoring new location"
    );
    true
}

pub fn is_module_loaded() -> bool {
    MODULE.get().is_some()
}

/// Stimulator driven through the process-wide native module
#[derive(Debug, Clone, Copy)]
pub struct NativeDevice {
    module: &'static NativeModule,
}

impl NativeDevice {
    /// Bind to the native module, loading it if this is the first device
    pub fn open(override_path: Option<&Path>) -> Result<Self, ModuleLoadError> {
        Ok(Self { module: global_module(override_path)? })
    }
}

impl StimulatorDevice for NativeDevice {
    fn set(&mut self, params: &DeviceParameters) -> Result<StatusCode, DeviceError> {
        // SAFETY: signature bound in `NativeModule::load`; arguments are plain integers.
        let status = unsafe {
            (self.module.set)(
                params.mode,
                params.polarity,
                params.source,
                params.demand,
                params.pulse_width,
                params.dwell,
                params.recovery,
                params.enabled,
            )
        };
        Ok(StatusCode(status))
    }

    fn get(&mut self) -> Result<(DeviceParameters, StatusCode), DeviceError> {
        let mut out = DeviceParameters::default();
        // SAFETY: every pointer refers to a distinct live field of `out`.
        let status = unsafe {
            (self.module.get)(
                &mut out.mode,
                &mut out.polarity,
                &mut out.source,
                &mut out.demand,
                &mut out.pulse_width,
                &mut out.dwell,
                &mut out.recovery,
                &mut out.enabled,
            )
        };
        Ok((out, StatusCode(status)))
    }

    fn trigger(&mut self) -> Result<StatusCode, DeviceError> {
        // SAFETY: no arguments; signature bound in `NativeModule::load`.
        let status = unsafe { (self.module.trigger)() };
        Ok(StatusCode(status))
    }
}
