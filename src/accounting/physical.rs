//! Mass → volume → length, treating filament as a uniform cylinder.

use std::f64::consts::PI;

/// Volume in cm³ of `mass_g` grams at `density_g_cm3`.
pub fn volume_cm3(mass_g: f64, density_g_cm3: f64) -> f64 {
    mass_g / density_g_cm3
}

/// Cross-section of a filament strand of `diameter_mm`, in cm².
pub fn cross_section_cm2(diameter_mm: f64) -> f64 {
    let radius_cm = diameter_mm / 2.0 / 10.0;
    PI * radius_cm * radius_cm
}

/// Length in metres of `mass_g` grams of filament.
pub fn length_m(mass_g: f64, density_g_cm3: f64, diameter_mm: f64) -> f64 {
    volume_cm3(mass_g, density_g_cm3) / cross_section_cm2(diameter_mm) / 100.0
}
