//! The bundled rule sequence: migrates the scaler module to route through
//! the biadaptive scaler.
//!
//! Rule order matters. The banner rule anchors on text the later rules leave
//! alone, and each replacement destroys its own match pattern, so re-running
//! the sequence on an already-migrated file is a safe no-op.

use crate::rule::PatchRule;

/// The file this rule set was written against.
pub const DEFAULT_TARGET: &str = "src/graphics/scaling.rs";

/// Build the scaler migration rules, in application order.
pub fn scaler_migration() -> Vec<PatchRule> {
    vec![
        scale_cache_banner(),
        manager_biadaptive_field(),
        manager_new_biadaptive(),
        manager_with_capacity_biadaptive(),
        scale_dispatch_biadaptive(),
    ]
}

/// Insert the section banner between the `BiadaptiveScaler` default impl and
/// `ScaleCacheKey`. The impl body is arbitrary, so a wildcard gap carries it
/// through the replacement unchanged.
fn scale_cache_banner() -> PatchRule {
    PatchRule::pattern(
        "scale-cache-banner",
        "impl Default for BiadaptiveScaler {$$$}\npub struct ScaleCacheKey",
        "impl Default for BiadaptiveScaler {$$$}\n\n\
         // ==============================================================================\n\
         // Scaling Cache\n\
         // ==============================================================================\n\n\
         pub struct ScaleCacheKey",
    )
}

/// Add the `biadaptive` field to the `ScalerManager` struct.
fn manager_biadaptive_field() -> PatchRule {
    let old = r#"pub struct ScalerManager {
    /// Nearest-neighbor scaler
    nearest: NearestScaler,
    /// Bilinear scaler
    bilinear: BilinearScaler,
    /// Trilinear scaler
    trilinear: TrilinearScaler,
    /// HQ2x scaler
    hq2x: Hq2xScaler,
    /// Scaling cache
    cache: ScaleCache,
}"#;

    let new = r#"pub struct ScalerManager {
    /// Nearest-neighbor scaler
    nearest: NearestScaler,
    /// Bilinear scaler
    bilinear: BilinearScaler,
    /// Trilinear scaler
    trilinear: TrilinearScaler,
    /// HQ2x scaler
    hq2x: Hq2xScaler,
    /// Biadaptive scaler
    biadaptive: BiadaptiveScaler,
    /// Scaling cache
    cache: ScaleCache,
}"#;

    PatchRule::literal("manager-biadaptive-field", old, new).all_occurrences()
}

/// Initialize the new field in `new()`. Limited to the first occurrence so
/// the `with_cache_capacity` constructor keeps its own rule.
fn manager_new_biadaptive() -> PatchRule {
    let old = r#"Self {
            nearest: NearestScaler::new(),
            bilinear: BilinearScaler::new(),
            trilinear: TrilinearScaler::new(),
            hq2x: Hq2xScaler::new(),
            cache: ScaleCache::new(64),
        }"#;

    let new = r#"Self {
            nearest: NearestScaler::new(),
            bilinear: BilinearScaler::new(),
            trilinear: TrilinearScaler::new(),
            hq2x: Hq2xScaler::new(),
            biadaptive: BiadaptiveScaler::new(),
            cache: ScaleCache::new(64),
        }"#;

    PatchRule::literal("manager-new-biadaptive", old, new)
}

/// Initialize the new field in `with_cache_capacity()`.
fn manager_with_capacity_biadaptive() -> PatchRule {
    let old = r#"Self {
            nearest: NearestScaler::new(),
            bilinear: BilinearScaler::new(),
            trilinear: TrilinearScaler::new(),
            hq2x: Hq2xScaler::new(),
            cache: ScaleCache::new(capacity),
        }"#;

    let new = r#"Self {
            nearest: NearestScaler::new(),
            bilinear: BilinearScaler::new(),
            trilinear: TrilinearScaler::new(),
            hq2x: Hq2xScaler::new(),
            biadaptive: BiadaptiveScaler::new(),
            cache: ScaleCache::new(capacity),
        }"#;

    PatchRule::literal("manager-with-capacity-biadaptive", old, new).all_occurrences()
}

/// Route `ScaleMode::Biadaptive` through the new scaler in `scale()`.
fn scale_dispatch_biadaptive() -> PatchRule {
    let old = r#"let result = match params.mode {
            ScaleMode::Nearest => self.nearest.scale(src, params),
            ScaleMode::Bilinear => self.bilinear.scale(src, params),
            ScaleMode::Trilinear => self.trilinear.scale(src, params),
            ScaleMode::Hq2x => self.hq2x.scale(src, params),
            ScaleMode::Step => self.nearest.scale(src, params), // Step uses nearest
        };"#;

    let new = r#"let result = match params.mode {
            ScaleMode::Nearest => self.nearest.scale(src, params),
            ScaleMode::Bilinear => self.bilinear.scale(src, params),
            ScaleMode::Trilinear => self.trilinear.scale(src, params),
            ScaleMode::Hq2x => self.hq2x.scale(src, params),
            ScaleMode::Biadaptive => self.biadaptive.scale(src, params),
            ScaleMode::Step => self.nearest.scale(src, params), // Step uses nearest
        };"#;

    PatchRule::literal("scale-dispatch-biadaptive", old, new).all_occurrences()
}
