use procwatch_core::ProbeFactory;

/// Platform-independent factory that selects the appropriate probe at
/// compile time
pub struct PlatformProbeFactory;

impl ProbeFactory for PlatformProbeFactory {
    #[cfg(unix)]
    type Probe = procwatch_unix::UnixProbe;

    #[cfg(windows)]
    type Probe = procwatch_windows::WindowsProbe;

    fn create_probe() -> Self::Probe {
        #[cfg(unix)]
        return procwatch_unix::UnixProbe::new();

        #[cfg(windows)]
        return procwatch_windows::WindowsProbe::new();
    }

    fn platform_name() -> &'static str {
        #[cfg(unix)]
        return "unix";

        #[cfg(windows)]
        return "windows";
    }
}
