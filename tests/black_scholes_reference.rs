//! Reference-value and limit checks for the analytic engine.

use approx::assert_relative_eq;
use optionix::core::{Greeks, OptionType, PricingEngine};
use optionix::engines::analytic::{BlackScholesEngine, bs_price};
use optionix::instruments::EuropeanOption;

#[test]
fn atm_reference_prices() {
    let call = EuropeanOption::call(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
    let put = EuropeanOption::put(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();

    assert_relative_eq!(BlackScholesEngine::new(call).price(), 10.4506, epsilon = 2e-4);
    assert_relative_eq!(BlackScholesEngine::new(put).price(), 5.5735, epsilon = 2e-4);
}

#[test]
fn atm_reference_greeks() {
    let call = EuropeanOption::call(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
    let g = BlackScholesEngine::new(call).greeks();

    assert_relative_eq!(g.delta, 0.63683, epsilon = 1e-4);
    assert_relative_eq!(g.gamma, 0.018762, epsilon = 1e-5);
    assert_relative_eq!(g.vega, 37.524, epsilon = 1e-2);
    assert_relative_eq!(g.theta, -6.414, epsilon = 1e-2);
    assert_relative_eq!(g.rho, 53.232, epsilon = 1e-2);
}

#[test]
fn put_call_parity_across_a_parameter_grid() {
    let spots = [80.0, 100.0, 120.0];
    let strikes = [90.0, 100.0, 110.0];
    let expiries = [0.25, 1.0, 3.0];
    let vols = [0.1, 0.2, 0.4];
    let rate = 0.03;
    let q = 0.01;

    for &s in &spots {
        for &k in &strikes {
            for &t in &expiries {
                for &sigma in &vols {
                    let c = bs_price(OptionType::Call, s, k, rate, q, sigma, t);
                    let p = bs_price(OptionType::Put, s, k, rate, q, sigma, t);
                    let rhs = s * (-q * t).exp() - k * (-rate * t).exp();
                    assert!(
                        ((c - p) - rhs).abs() < 1e-10,
                        "parity violated at s={s} k={k} t={t} sigma={sigma}"
                    );
                }
            }
        }
    }
}

#[test]
fn vanishing_expiry_limit_is_intrinsic_at_spot() {
    for (side, s, k, expected) in [
        (OptionType::Call, 105.0, 100.0, 5.0),
        (OptionType::Call, 95.0, 100.0, 0.0),
        (OptionType::Put, 95.0, 100.0, 5.0),
        (OptionType::Put, 105.0, 100.0, 0.0),
    ] {
        let option = EuropeanOption::new(side, s, k, 1e-13, 0.05, 0.2, 0.0).unwrap();
        let mut engine = BlackScholesEngine::new(option);
        assert_eq!(engine.price(), expected);
        assert_eq!(engine.greeks(), Greeks::default());
    }
}

#[test]
fn vanishing_vol_limit_is_discounted_forward_payoff() {
    let (s, k, t, r, q): (f64, f64, f64, f64, f64) = (100.0, 95.0, 2.0, 0.04, 0.01);
    let forward = s * ((r - q) * t).exp();

    let call = EuropeanOption::new(OptionType::Call, s, k, t, r, 1e-13, q).unwrap();
    let expected = (-r * t).exp() * (forward - k).max(0.0);
    assert_relative_eq!(BlackScholesEngine::new(call).price(), expected, epsilon = 1e-12);

    let put = EuropeanOption::new(OptionType::Put, s, k, t, r, 1e-13, q).unwrap();
    let expected = (-r * t).exp() * (k - forward).max(0.0);
    assert_relative_eq!(BlackScholesEngine::new(put).price(), expected, epsilon = 1e-12);
}

#[test]
fn deep_moneyness_bounds() {
    // Deep ITM call approaches its discounted parity value, deep OTM decays
    // toward zero; both must respect static no-arbitrage bounds.
    let itm = bs_price(OptionType::Call, 200.0, 100.0, 0.05, 0.0, 0.2, 1.0);
    assert!(itm > 100.0 && itm < 200.0);

    let otm = bs_price(OptionType::Call, 50.0, 100.0, 0.05, 0.0, 0.2, 1.0);
    assert!(otm >= 0.0 && otm < 1.0);
}
