use serde::{Deserialize, Serialize};

/// Permission status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
    /// Permission not determined (user hasn't been asked yet)
    NotDetermined,
    /// Permission restricted (parental controls, etc)
    Restricted,
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not_determined"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

/// Detailed permission information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionInfo {
    pub status: PermissionStatus,
    pub message: String,
    pub can_request: bool,
}

impl PermissionInfo {
    pub fn granted(message: impl Into<String>) -> Self {
        Self {
            status: PermissionStatus::Granted,
            message: message.into(),
            can_request: false,
        }
    }

    pub fn denied(message: impl Into<String>, can_request: bool) -> Self {
        Self {
            status: PermissionStatus::Denied,
            message: message.into(),
            can_request,
        }
    }

    pub fn not_determined(message: impl Into<String>, can_request: bool) -> Self {
        Self {
            status: PermissionStatus::NotDetermined,
            message: message.into(),
            can_request,
        }
    }

    pub fn is_granted(&self) -> bool {
        self.status == PermissionStatus::Granted
    }
}

/// What the camera screen must render for the current permission state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PermissionGate {
    /// Status not known yet; render an empty view
    Loading,
    /// Blocking explanation; the retry button is shown when `can_request`
    Prompt { message: String, can_request: bool },
    /// Camera screen is usable
    Ready,
}

impl PermissionGate {
    pub fn from_info(info: Option<&PermissionInfo>) -> Self {
        match info {
            None => PermissionGate::Loading,
            Some(info) if info.is_granted() => PermissionGate::Ready,
            Some(info) => PermissionGate::Prompt {
                message: info.message.clone(),
                can_request: info.can_request,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PermissionGate::Ready)
    }
}

/// Check camera permission status with detailed information
pub fn check_permission_detailed() -> PermissionInfo {
    #[cfg(target_os = "linux")]
    {
        check_permission_linux()
    }

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        check_permission_by_enumeration()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        PermissionInfo::not_determined("Platform not supported", false)
    }
}

// Windows privacy settings and macOS TCC both hide devices from enumeration
// until access is granted.
#[cfg(any(target_os = "windows", target_os = "macos"))]
fn check_permission_by_enumeration() -> PermissionInfo {
    use nokhwa::query;

    match query(nokhwa::utils::ApiBackend::Auto) {
        Ok(devices) if !devices.is_empty() => {
            PermissionInfo::granted(format!("Camera access granted ({} devices)", devices.len()))
        }
        Ok(_) => PermissionInfo::not_determined(
            "No cameras found - permission may not be granted",
            true,
        ),
        Err(e) => PermissionInfo::denied(format!("Camera access denied: {}", e), true),
    }
}

#[cfg(target_os = "linux")]
fn check_permission_linux() -> PermissionInfo {
    use std::fs;
    use std::path::Path;

    let video_devices: Vec<_> = (0..10)
        .map(|i| format!("/dev/video{}", i))
        .filter(|path| Path::new(path).exists())
        .collect();

    let Some(first_device) = video_devices.first() else {
        return PermissionInfo::not_determined("No video devices found at /dev/video*", false);
    };

    match fs::metadata(first_device) {
        Ok(_) if check_linux_group_membership() => PermissionInfo::granted(format!(
            "Camera access granted (user in video group, {} found)",
            first_device
        )),
        Ok(_) => PermissionInfo::denied(
            format!(
                "Camera device {} exists but user not in video group - run: sudo usermod -a -G video $USER",
                first_device
            ),
            true,
        ),
        Err(e) => PermissionInfo::denied(format!("Cannot access {}: {}", first_device, e), true),
    }
}

#[cfg(target_os = "linux")]
fn check_linux_group_membership() -> bool {
    use std::process::Command;

    Command::new("groups")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|groups| groups.contains("video") || groups.contains("plugdev"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_follows_status() {
        assert_eq!(PermissionGate::from_info(None), PermissionGate::Loading);
        assert!(PermissionGate::from_info(Some(&PermissionInfo::granted("ok"))).is_ready());

        let gate = PermissionGate::from_info(Some(&PermissionInfo::denied("no camera", true)));
        assert_eq!(
            gate,
            PermissionGate::Prompt {
                message: "no camera".to_string(),
                can_request: true
            }
        );
    }

    #[test]
    fn status_display() {
        assert_eq!(PermissionStatus::NotDetermined.to_string(), "not_determined");
    }
}
