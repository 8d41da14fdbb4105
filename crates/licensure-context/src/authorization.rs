use licensure_model::{LicenseError, Result};

/// The five authorization gates a manager operation must clear before any
/// I/O, cryptography, or cache mutation occurs.
pub trait LicenseManagementAuthorization: Send + Sync {
    /// Gate for `generateKeyFrom`.
    fn clear_generate(&self) -> Result<()> {
        Ok(())
    }

    /// Gate for `install`.
    fn clear_install(&self) -> Result<()> {
        Ok(())
    }

    /// Gate for `load`.
    fn clear_load(&self) -> Result<()> {
        Ok(())
    }

    /// Gate for `verify`.
    fn clear_verify(&self) -> Result<()> {
        Ok(())
    }

    /// Gate for `uninstall`.
    fn clear_uninstall(&self) -> Result<()> {
        Ok(())
    }
}

/// The default authorization: permits every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermitAll;

impl LicenseManagementAuthorization for PermitAll {}

/// An authorization that denies a configured, fixed set of gates — used in
/// tests to exercise the "any gate denies ⇒ no side effects" invariant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyGates {
    /// Deny `generateKeyFrom`.
    pub generate: bool,
    /// Deny `install`.
    pub install: bool,
    /// Deny `load`.
    pub load: bool,
    /// Deny `verify`.
    pub verify: bool,
    /// Deny `uninstall`.
    pub uninstall: bool,
}

fn deny(gate: &str) -> Result<()> {
    Err(LicenseError::authorization_denied(gate))
}

impl LicenseManagementAuthorization for DenyGates {
    fn clear_generate(&self) -> Result<()> {
        if self.generate {
            deny("clearGenerate")
        } else {
            Ok(())
        }
    }

    fn clear_install(&self) -> Result<()> {
        if self.install {
            deny("clearInstall")
        } else {
            Ok(())
        }
    }

    fn clear_load(&self) -> Result<()> {
        if self.load {
            deny("clearLoad")
        } else {
            Ok(())
        }
    }

    fn clear_verify(&self) -> Result<()> {
        if self.verify {
            deny("clearVerify")
        } else {
            Ok(())
        }
    }

    fn clear_uninstall(&self) -> Result<()> {
        if self.uninstall {
            deny("clearUninstall")
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permit_all_clears_every_gate() {
        let auth = PermitAll;
        assert!(auth.clear_generate().is_ok());
        assert!(auth.clear_install().is_ok());
        assert!(auth.clear_load().is_ok());
        assert!(auth.clear_verify().is_ok());
        assert!(auth.clear_uninstall().is_ok());
    }

    #[test]
    fn deny_gates_only_denies_configured_gates() {
        let auth = DenyGates {
            install: true,
            ..Default::default()
        };
        assert!(auth.clear_generate().is_ok());
        assert!(auth.clear_install().is_err());
    }
}
