mod tests {
    use approx::assert_relative_eq;

    use crate::velocity::{circular_orbital_velocity, Velocity, CODE_VELOCITY_KM_PER_SEC};

    #[test]
    fn code_velocity_is_earth_orbital_speed() {
        assert_relative_eq!(CODE_VELOCITY_KM_PER_SEC, 29.78, epsilon = 0.01);
    }

    #[test]
    fn test_velocity_conversions() {
        let sigma = Velocity::from_km_per_sec(10.0);
        assert_relative_eq!(sigma.to_km_per_sec(), 10.0);
        assert_relative_eq!(sigma.to_code_units(), 10.0 / CODE_VELOCITY_KM_PER_SEC);
    }

    #[test]
    fn test_velocity_arithmetic() {
        let a = Velocity::from_code_units(2.0);
        let b = Velocity::from_code_units(0.5);

        assert_relative_eq!((a + b).to_code_units(), 2.5);
        assert_relative_eq!((a - b).to_code_units(), 1.5);
        assert_relative_eq!((a * 2.0).to_code_units(), 4.0);
        assert_relative_eq!(a / b, 4.0);
    }

    #[test]
    fn circular_velocity_scales_with_radius() {
        let inner = circular_orbital_velocity(1.0, 1.0);
        let outer = circular_orbital_velocity(1.0, 4.0);

        assert_relative_eq!(inner.to_code_units(), 1.0);
        assert_relative_eq!(outer.to_code_units(), 0.5);
    }
}
