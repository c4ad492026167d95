//! Dynamic library loading for the NDI runtime.
//!
//! This module loads the vendor shared library, resolves the full entry
//! point table and initializes the runtime. The result is a [`Binding`]
//! context shared as `Arc<Binding>` by every instance created from it.

use crate::error::{NdiError, NdiResult};
use crate::strings::string_from_static;
use crate::symbols::{ep, Entry, EntryPoint, SymbolSource, SymbolTable};
use lib_ndi_types::{
    AudioFrameInterleaved16s, AudioFrameInterleaved32f, AudioFrameInterleaved32s, AudioFrameV2,
    VideoFrameV2,
};
use libloading::Library;
use std::collections::HashMap;
use std::ffi::c_void;
use std::fmt;
use std::mem::size_of;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, Weak};

/// Helper trait to recover from poisoned mutexes.
///
/// The registry only holds weak references, so data left behind by a
/// panicking thread is still consistent enough to keep using.
trait RecoverMutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> RecoverMutex<T> for Mutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Mutex was poisoned, recovering data");
            poisoned.into_inner()
        })
    }
}

type Entries = HashMap<PathBuf, Weak<Binding>>;

/// Bindings loaded from a path, keyed by canonical path.
///
/// An entry whose binding is dead but still present belongs to a binding
/// that is being torn down; its `Drop` removes it and signals `released`.
struct Registry {
    entries: Mutex<Entries>,
    released: Condvar,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock_recover()
    }

    fn wait_released<'a>(&self, entries: MutexGuard<'a, Entries>) -> MutexGuard<'a, Entries> {
        self.released.wait(entries).unwrap_or_else(|poisoned| {
            tracing::warn!("Mutex was poisoned, recovering data");
            poisoned.into_inner()
        })
    }
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry {
        entries: Mutex::new(HashMap::new()),
        released: Condvar::new(),
    })
}

/// A shared library opened with `libloading`.
pub struct NativeLibrary {
    library: Library,
    path: String,
}

impl NativeLibrary {
    /// Open the library at `path`.
    ///
    /// Missing files, wrong architectures and permission problems all
    /// surface as [`NdiError::LoadFailure`] carrying the loader's message.
    pub fn open<P: AsRef<Path>>(path: P) -> NdiResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        // SAFETY: running the library's initializers is inherent to loading
        // it; the runtime has no unsound static constructors.
        let library = unsafe { Library::new(path) }
            .map_err(|e| NdiError::load_failure(&path_str, e))?;

        Ok(Self {
            library,
            path: path_str,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SymbolSource for NativeLibrary {
    fn lookup(&self, name: &str) -> Option<NonNull<c_void>> {
        // SAFETY: the address is only stored; callers transmute it to the
        // signature declared for the entry.
        unsafe { self.library.get::<*mut c_void>(name.as_bytes()) }
            .ok()
            .and_then(|symbol| NonNull::new(*symbol))
    }

    fn origin(&self) -> &str {
        &self.path
    }
}

/// A loaded, resolved and initialized runtime.
///
/// Dropping the last reference calls `NDIlib_destroy` and then unloads the
/// module. Every instance wrapper holds an `Arc<Binding>`, so the module
/// always outlives the instances created from it.
pub struct Binding {
    table: SymbolTable,
    version: OnceLock<Option<String>>,
    registry_key: Option<PathBuf>,
    /// Dropped last so the table never outlives the code it points into.
    source: Box<dyn SymbolSource>,
}

impl Binding {
    /// Load the runtime from `path`.
    ///
    /// Loading a path whose binding is still alive is a no-op returning the
    /// existing binding. Concurrent loads are serialized, and a load never
    /// initializes while a previous binding of the same path is tearing down.
    pub fn load<P: AsRef<Path>>(path: P) -> NdiResult<Arc<Self>> {
        Self::load_with(path.as_ref(), |path| {
            Ok(Box::new(NativeLibrary::open(path)?) as Box<dyn SymbolSource>)
        })
    }

    /// [`Self::load`] with the library opened by `open`.
    pub(crate) fn load_with<F>(path: &Path, open: F) -> NdiResult<Arc<Self>>
    where
        F: FnOnce(&Path) -> NdiResult<Box<dyn SymbolSource>>,
    {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let registry = registry();

        let mut entries = registry.lock();
        loop {
            let live = entries.get(&key).map(Weak::upgrade);
            match live {
                Some(Some(existing)) => {
                    tracing::debug!(path = %key.display(), "Reusing loaded NDI runtime");
                    return Ok(existing);
                }
                Some(None) => entries = registry.wait_released(entries),
                None => break,
            }
        }

        let mut binding = Self::bind(open(path)?)?;
        binding.registry_key = Some(key.clone());

        let binding = Arc::new(binding);
        entries.insert(key, Arc::downgrade(&binding));
        Ok(binding)
    }

    /// Bind to an already opened symbol source.
    ///
    /// Useful for statically linked runtimes. Bindings created this way are
    /// not shared through the path registry.
    pub fn from_source(source: Box<dyn SymbolSource>) -> NdiResult<Arc<Self>> {
        Ok(Arc::new(Self::bind(source)?))
    }

    fn bind(source: Box<dyn SymbolSource>) -> NdiResult<Self> {
        let table = SymbolTable::resolve(source.as_ref(), Entry::ALL)?;

        let initialize = table.entry::<ep::Initialize>()?;
        // SAFETY: signature declared in `ep`.
        if !unsafe { initialize() } {
            tracing::warn!(origin = source.origin(), "NDIlib_initialize failed");
            return Err(NdiError::InitializeFailed);
        }

        tracing::info!(
            origin = source.origin(),
            entries = table.len(),
            "Loaded NDI runtime"
        );

        Ok(Self {
            table,
            version: OnceLock::new(),
            registry_key: None,
            source,
        })
    }

    /// Release the runtime now.
    ///
    /// Fails, handing the reference back, while any instance or other
    /// clone still holds the binding.
    pub fn shutdown(self: Arc<Self>) -> Result<(), Arc<Self>> {
        Arc::try_unwrap(self).map(drop)
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Where the entry points were resolved from.
    pub fn origin(&self) -> &str {
        self.source.origin()
    }

    pub(crate) fn entry<E: EntryPoint>(&self) -> NdiResult<E::Fn> {
        self.table.entry::<E>()
    }

    /// Runtime version string, read once and cached.
    pub fn version(&self) -> NdiResult<Option<&str>> {
        if let Some(cached) = self.version.get() {
            return Ok(cached.as_deref());
        }
        let version = self.entry::<ep::Version>()?;
        // SAFETY: the version string is static data of the loaded module.
        let value = unsafe { string_from_static(version())? };
        Ok(self.version.get_or_init(|| value).as_deref())
    }

    /// Whether the CPU meets the runtime's requirements.
    pub fn is_supported_cpu(&self) -> NdiResult<bool> {
        let is_supported = self.entry::<ep::IsSupportedCpu>()?;
        Ok(unsafe { is_supported() })
    }

    /// Convert planar float audio to interleaved 16-bit.
    ///
    /// `dst` receives `no_channels * no_samples` samples. The returned
    /// descriptor points into `dst`.
    ///
    /// # Safety
    ///
    /// `src.data` must be null or cover [`AudioFrameV2::data_len`] bytes.
    pub unsafe fn audio_to_interleaved_16s(
        &self,
        src: &AudioFrameV2,
        reference_level: i32,
        dst: &mut [i16],
    ) -> NdiResult<AudioFrameInterleaved16s> {
        let convert = self.entry::<ep::UtilAudioToInterleaved16sV2>()?;
        let mut out = AudioFrameInterleaved16s {
            sample_rate: src.sample_rate,
            no_channels: src.no_channels,
            no_samples: src.no_samples,
            timecode: src.timecode,
            reference_level,
            data: dst.as_mut_ptr(),
        };
        check_len(out.sample_count(), dst.len())?;
        if !src.has_data() {
            return Err(NdiError::invalid_parameter("src", "no payload"));
        }
        unsafe { convert(src, &mut out) };
        Ok(out)
    }

    /// Convert interleaved 16-bit audio to planar float in `dst`.
    ///
    /// # Safety
    ///
    /// `src.data` must cover [`AudioFrameInterleaved16s::sample_count`] samples.
    pub unsafe fn audio_from_interleaved_16s(
        &self,
        src: &AudioFrameInterleaved16s,
        dst: &mut [f32],
    ) -> NdiResult<AudioFrameV2> {
        let convert = self.entry::<ep::UtilAudioFromInterleaved16sV2>()?;
        let mut out = planar_target(src.sample_rate, src.no_channels, src.no_samples, src.timecode, dst)?;
        if src.data.is_null() {
            return Err(NdiError::invalid_parameter("src", "no payload"));
        }
        unsafe { convert(src, &mut out) };
        Ok(out)
    }

    /// Convert planar float audio to interleaved float.
    ///
    /// # Safety
    ///
    /// As for [`Self::audio_to_interleaved_16s`].
    pub unsafe fn audio_to_interleaved_32f(
        &self,
        src: &AudioFrameV2,
        dst: &mut [f32],
    ) -> NdiResult<AudioFrameInterleaved32f> {
        let convert = self.entry::<ep::UtilAudioToInterleaved32fV2>()?;
        let mut out = AudioFrameInterleaved32f {
            sample_rate: src.sample_rate,
            no_channels: src.no_channels,
            no_samples: src.no_samples,
            timecode: src.timecode,
            data: dst.as_mut_ptr(),
        };
        check_len(out.sample_count(), dst.len())?;
        if !src.has_data() {
            return Err(NdiError::invalid_parameter("src", "no payload"));
        }
        unsafe { convert(src, &mut out) };
        Ok(out)
    }

    /// Convert interleaved float audio to planar float in `dst`.
    ///
    /// # Safety
    ///
    /// `src.data` must cover [`AudioFrameInterleaved32f::sample_count`] samples.
    pub unsafe fn audio_from_interleaved_32f(
        &self,
        src: &AudioFrameInterleaved32f,
        dst: &mut [f32],
    ) -> NdiResult<AudioFrameV2> {
        let convert = self.entry::<ep::UtilAudioFromInterleaved32fV2>()?;
        let mut out = planar_target(src.sample_rate, src.no_channels, src.no_samples, src.timecode, dst)?;
        if src.data.is_null() {
            return Err(NdiError::invalid_parameter("src", "no payload"));
        }
        unsafe { convert(src, &mut out) };
        Ok(out)
    }

    /// Convert planar float audio to interleaved 32-bit integers.
    ///
    /// # Safety
    ///
    /// As for [`Self::audio_to_interleaved_16s`].
    pub unsafe fn audio_to_interleaved_32s(
        &self,
        src: &AudioFrameV2,
        reference_level: i32,
        dst: &mut [i32],
    ) -> NdiResult<AudioFrameInterleaved32s> {
        let convert = self.entry::<ep::UtilAudioToInterleaved32sV2>()?;
        let mut out = AudioFrameInterleaved32s {
            sample_rate: src.sample_rate,
            no_channels: src.no_channels,
            no_samples: src.no_samples,
            timecode: src.timecode,
            reference_level,
            data: dst.as_mut_ptr(),
        };
        check_len(out.sample_count(), dst.len())?;
        if !src.has_data() {
            return Err(NdiError::invalid_parameter("src", "no payload"));
        }
        unsafe { convert(src, &mut out) };
        Ok(out)
    }

    /// Convert interleaved 32-bit integer audio to planar float in `dst`.
    ///
    /// # Safety
    ///
    /// `src.data` must cover [`AudioFrameInterleaved32s::sample_count`] samples.
    pub unsafe fn audio_from_interleaved_32s(
        &self,
        src: &AudioFrameInterleaved32s,
        dst: &mut [f32],
    ) -> NdiResult<AudioFrameV2> {
        let convert = self.entry::<ep::UtilAudioFromInterleaved32sV2>()?;
        let mut out = planar_target(src.sample_rate, src.no_channels, src.no_samples, src.timecode, dst)?;
        if src.data.is_null() {
            return Err(NdiError::invalid_parameter("src", "no payload"));
        }
        unsafe { convert(src, &mut out) };
        Ok(out)
    }

    /// Repack 10-bit V210 video into 16-bit P216.
    ///
    /// # Safety
    ///
    /// Both descriptors must point at buffers sized for their geometry.
    pub unsafe fn v210_to_p216(&self, src: &VideoFrameV2, dst: &mut VideoFrameV2) -> NdiResult<()> {
        let convert = self.entry::<ep::UtilV210ToP216>()?;
        unsafe { convert(src, dst) };
        Ok(())
    }

    /// Repack 16-bit P216 video into 10-bit V210.
    ///
    /// # Safety
    ///
    /// As for [`Self::v210_to_p216`].
    pub unsafe fn p216_to_v210(&self, src: &VideoFrameV2, dst: &mut VideoFrameV2) -> NdiResult<()> {
        let convert = self.entry::<ep::UtilP216ToV210>()?;
        unsafe { convert(src, dst) };
        Ok(())
    }
}

fn check_len(needed: Option<usize>, actual: usize) -> NdiResult<()> {
    let needed = needed.ok_or_else(|| NdiError::invalid_parameter("layout", "negative dimensions"))?;
    if actual < needed {
        return Err(NdiError::BufferTooSmall { needed, actual });
    }
    Ok(())
}

/// Planar descriptor over `dst` with tightly packed channels.
fn planar_target(
    sample_rate: i32,
    no_channels: i32,
    no_samples: i32,
    timecode: i64,
    dst: &mut [f32],
) -> NdiResult<AudioFrameV2> {
    let mut out = AudioFrameV2::new();
    out.sample_rate = sample_rate;
    out.timecode = timecode;
    out.set_layout(no_channels, no_samples);
    let needed = out.data_len().map(|bytes| bytes / size_of::<f32>());
    check_len(needed, dst.len())?;
    out.set_data(dst);
    Ok(out)
}

impl Drop for Binding {
    fn drop(&mut self) {
        // Loads of this path wait on the dead entry until it is removed
        // below, so destroy always precedes the next initialize.
        let entries = self.registry_key.as_ref().map(|_| registry().lock());

        match self.table.entry::<ep::Destroy>() {
            // SAFETY: no instance holds the binding any more.
            Ok(destroy) => unsafe { destroy() },
            Err(e) => tracing::warn!(error = %e, "Cannot destroy NDI runtime"),
        }

        if let (Some(key), Some(mut entries)) = (self.registry_key.as_ref(), entries) {
            if entries.get(key).is_some_and(|weak| weak.strong_count() == 0) {
                entries.remove(key);
            }
            drop(entries);
            registry().released.notify_all();
        }

        tracing::info!(origin = self.source.origin(), "Unloaded NDI runtime");
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("origin", &self.origin())
            .field("entries", &self.table.len())
            .finish()
    }
}

/// Platform-specific library format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryFormat {
    /// Windows DLL.
    Dll,
    /// Linux/Unix shared object.
    So,
    /// macOS dynamic library.
    Dylib,
    /// Unknown format.
    Unknown,
}

impl LibraryFormat {
    /// Detect format from file name. Versioned objects such as
    /// `libndi.so.6` count as shared objects.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("dll") | Some("DLL") => Self::Dll,
            Some("so") => Self::So,
            Some("dylib") => Self::Dylib,
            _ if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(".so.")) =>
            {
                Self::So
            }
            _ => Self::Unknown,
        }
    }

    /// Get the format of the current platform.
    #[cfg(target_os = "windows")]
    pub fn native() -> Self {
        Self::Dll
    }

    #[cfg(target_os = "linux")]
    pub fn native() -> Self {
        Self::So
    }

    #[cfg(target_os = "macos")]
    pub fn native() -> Self {
        Self::Dylib
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    pub fn native() -> Self {
        Self::Unknown
    }

    /// File names the runtime ships under, preferred first.
    pub fn default_file_names(self) -> &'static [&'static str] {
        match self {
            Self::Dll if cfg!(target_pointer_width = "64") => &["Processing.NDI.Lib.x64.dll"],
            Self::Dll => &["Processing.NDI.Lib.x86.dll"],
            Self::So => &["libndi.so.6", "libndi.so.5", "libndi.so"],
            Self::Dylib => &["libndi.dylib", "libndi_advanced.dylib"],
            Self::Unknown => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{self, StubLibrary};
    use lib_ndi_types::AudioFrameV2;

    #[test]
    fn test_library_format_detection() {
        assert_eq!(LibraryFormat::from_path("Processing.NDI.Lib.x64.dll"), LibraryFormat::Dll);
        assert_eq!(LibraryFormat::from_path("libndi.so"), LibraryFormat::So);
        assert_eq!(LibraryFormat::from_path("/usr/lib/libndi.so.6"), LibraryFormat::So);
        assert_eq!(LibraryFormat::from_path("libndi.dylib"), LibraryFormat::Dylib);
        assert_eq!(LibraryFormat::from_path("ndi.txt"), LibraryFormat::Unknown);
        assert_eq!(LibraryFormat::So.default_file_names()[0], "libndi.so.6");
        assert!(LibraryFormat::Unknown.default_file_names().is_empty());
    }

    #[test]
    fn test_nonexistent_path_is_load_failure() {
        let err = Binding::load("/nonexistent/dir/libndi.so.6").unwrap_err();
        match &err {
            NdiError::LoadFailure { path, .. } => assert!(path.contains("libndi.so.6")),
            other => panic!("expected LoadFailure, got {other:?}"),
        }
        assert!(err.is_fatal());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_bind_initializes_and_destroys() {
        stub::reset();
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        assert_eq!(binding.table().len(), Entry::COUNT);
        assert_eq!(binding.origin(), "stub");
        assert_eq!(stub::count("initialize"), 1);

        binding.shutdown().unwrap();
        assert_eq!(stub::count("destroy"), 1);
    }

    #[test]
    fn test_missing_symbol_never_initializes() {
        stub::reset();
        let err = Binding::from_source(Box::new(StubLibrary::new().without(Entry::RecvConnect)))
            .unwrap_err();
        assert!(matches!(err, NdiError::MissingSymbol { ref symbol } if symbol == "NDIlib_recv_connect"));
        assert_eq!(stub::count("initialize"), 0);
        assert_eq!(stub::count("destroy"), 0);
    }

    #[test]
    fn test_initialize_failure() {
        stub::reset();
        stub::with_state(|s| s.initialize_ok = false);
        let err = Binding::from_source(Box::new(StubLibrary::new())).unwrap_err();
        assert!(matches!(err, NdiError::InitializeFailed));
        assert_eq!(stub::count("destroy"), 0);
    }

    #[test]
    fn test_shutdown_refused_while_shared() {
        stub::reset();
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        let held = binding.clone();
        let binding = binding.shutdown().unwrap_err();
        assert_eq!(stub::count("destroy"), 0);
        drop(held);
        binding.shutdown().unwrap();
        assert_eq!(stub::count("destroy"), 1);
    }

    fn load_stub(path: &str) -> NdiResult<Arc<Binding>> {
        Binding::load_with(Path::new(path), |_| Ok(Box::new(StubLibrary::new()) as Box<dyn SymbolSource>))
    }

    #[test]
    fn test_second_load_shares_binding() {
        stub::reset();
        let first = load_stub("/stub/registry/shared/libndi.so.6").unwrap();
        let second = load_stub("/stub/registry/shared/libndi.so.6").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(stub::count("initialize"), 1);

        drop(first);
        assert_eq!(stub::count("destroy"), 0);
        drop(second);
        assert_eq!(stub::count("destroy"), 1);
        assert!(!registry().lock().contains_key(Path::new("/stub/registry/shared/libndi.so.6")));

        let third = load_stub("/stub/registry/shared/libndi.so.6").unwrap();
        assert_eq!(stub::count("initialize"), 2);
        drop(third);
        assert_eq!(stub::count("destroy"), 2);
    }

    #[test]
    fn test_failed_open_leaves_no_entry() {
        let path = Path::new("/stub/registry/failing/libndi.so.6");
        let err = Binding::load_with(path, |p| Err(NdiError::missing_symbol(p.display().to_string())))
            .unwrap_err();
        assert!(matches!(err, NdiError::MissingSymbol { .. }));
        assert!(!registry().lock().contains_key(path));
    }

    #[test]
    fn test_load_waits_for_teardown_in_progress() {
        let key = PathBuf::from("/stub/registry/teardown/libndi.so.6");
        registry().lock().insert(key.clone(), Weak::new());

        let path = key.clone();
        let loader = std::thread::spawn(move || {
            stub::reset();
            let binding = load_stub(path.to_str().unwrap()).unwrap();
            let initialized = stub::count("initialize");
            drop(binding);
            initialized
        });

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(!loader.is_finished());

        registry().lock().remove(&key);
        registry().released.notify_all();
        assert_eq!(loader.join().unwrap(), 1);
        assert!(!registry().lock().contains_key(&key));
    }

    #[test]
    fn test_version_cached() {
        stub::reset();
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        assert_eq!(binding.version().unwrap(), Some(stub::VERSION));
        assert_eq!(binding.version().unwrap(), Some(stub::VERSION));
        assert_eq!(stub::count("version"), 1);
        assert!(binding.is_supported_cpu().unwrap());
    }

    #[test]
    fn test_audio_conversion_checks_buffers() {
        stub::reset();
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();

        let mut planar = vec![0.25f32; 2 * 4];
        let mut src = AudioFrameV2::new();
        src.set_layout(2, 4);
        src.set_data(&mut planar);

        let mut short = vec![0i16; 7];
        let err = unsafe { binding.audio_to_interleaved_16s(&src, 20, &mut short) }.unwrap_err();
        assert!(matches!(err, NdiError::BufferTooSmall { needed: 8, actual: 7 }));
        assert_eq!(stub::count("util_audio_to_interleaved_16s_v2"), 0);

        let mut interleaved = vec![0i16; 8];
        let out = unsafe { binding.audio_to_interleaved_16s(&src, 20, &mut interleaved) }.unwrap();
        assert_eq!(out.reference_level, 20);
        assert_eq!(out.data, interleaved.as_mut_ptr());
        assert_eq!(stub::count("util_audio_to_interleaved_16s_v2"), 1);

        let mut back = vec![0f32; 8];
        let planar_out = unsafe { binding.audio_from_interleaved_16s(&out, &mut back) }.unwrap();
        assert_eq!(planar_out.channel_stride, 16);
        assert_eq!(planar_out.data_len(), Some(32));
    }

    #[test]
    fn test_audio_conversion_rejects_null_source() {
        let binding = Binding::from_source(Box::new(StubLibrary::new())).unwrap();
        let mut src = AudioFrameV2::new();
        src.set_layout(2, 4);
        let mut dst = vec![0f32; 8];
        let err = unsafe { binding.audio_to_interleaved_32f(&src, &mut dst) }.unwrap_err();
        assert!(matches!(err, NdiError::InvalidParameter { .. }));
    }
}
