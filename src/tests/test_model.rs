use ndarray::{array, Array1};
use crate::model::{combine_candidates, q_value, td_update, LinearQModel};

fn max_abs(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0f64, |m, x| m.max(x.abs()))
}

#[test]
fn test_q_value_is_inner_product() {
    let w = array![0.5, -1.0, 0.25, 2.0, -0.75];
    let phi = array![1.0, 0.5, 0.4, 0.0, 1.0];
    let expected: f64 = w.iter().zip(phi.iter()).map(|(a, b)| a * b).sum();
    assert!((q_value(&w, &phi) - expected).abs() < 1e-12);
}

#[test]
fn test_td_update_formula() {
    let w = array![0.5, 0.5, 0.5, 0.5, 0.5];
    let phi = array![1.0, 0.5, 0.0, 2.0, -1.0];
    // td error = 1 + 0.9 * 2 - 0.3 = 2.5, step = 0.1 * 2.5 = 0.25
    let next = td_update(&w, &phi, 1.0, 2.0, 0.3, 0.1, 0.9);
    let expected = array![0.25, 0.375, 0.5, 0.0, 0.75];
    for (a, b) in next.iter().zip(expected.iter()) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }
}

#[test]
fn test_td_update_zero_error_keeps_weights() {
    let w = array![0.1, -0.2, 0.3, -0.4, 0.5];
    let phi = array![1.0, 1.0, 1.0, 1.0, 1.0];
    // reward + gamma * next - current = 0.9 + 0.9 * 1.0 - 1.8 = 0
    let next = td_update(&w, &phi, 0.9, 1.0, 1.8, 0.5, 0.9);
    for (a, b) in next.iter().zip(w.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_combine_averages_then_normalizes() {
    let candidates = vec![
        array![2.0, 0.0, 0.0, 0.0, -4.0],
        array![0.0, 0.0, 0.0, 0.0, 0.0],
    ];
    let combined = combine_candidates(&candidates).unwrap();
    assert_eq!(combined, array![0.5, 0.0, 0.0, 0.0, -1.0]);
    assert_eq!(max_abs(&combined), 1.0);
}

#[test]
fn test_combine_all_zero_skips_normalization() {
    let combined = combine_candidates(&[Array1::zeros(5), Array1::zeros(5)]).unwrap();
    assert_eq!(combined, Array1::<f64>::zeros(5));
}

#[test]
fn test_combine_nothing() {
    assert_eq!(combine_candidates(&[]), None);
}

#[test]
fn test_combine_is_order_independent_average() {
    let a = array![0.3, -0.1, 0.2, 0.0, 0.6];
    let b = array![-0.9, 0.4, 0.1, 0.2, 0.0];
    let ab = combine_candidates(&[a.clone(), b.clone()]).unwrap();
    let ba = combine_candidates(&[b, a]).unwrap();
    for (x, y) in ab.iter().zip(ba.iter()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn test_model_candidate_uses_current_value() {
    let model = LinearQModel::new(array![1.0, 0.0, 0.0, 0.0, 0.0], 0.5, 0.9).unwrap();
    let phi = array![1.0, 0.0, 0.0, 0.0, 0.0];
    // Q = 1, td error = 2 + 0.9 * 0 - 1 = 1, step 0.5
    let candidate = model.candidate(&phi, 2.0, 0.0);
    assert_eq!(candidate, array![0.5, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_model_apply_normalizes() {
    let mut model = LinearQModel::new(array![0.2, 0.1, 0.0, -0.1, 0.0], 0.01, 0.9).unwrap();
    let phi_a = array![1.0, 1.0, 0.5, 0.0, 0.0];
    let phi_b = array![1.0, 0.2, 0.3, 0.5, 1.0];
    let proposals = vec![
        model.candidate(&phi_a, 10.0, 0.5),
        model.candidate(&phi_b, -3.0, 0.1),
    ];
    assert!(model.apply(&proposals));
    assert!((max_abs(model.weights()) - 1.0).abs() < 1e-12);
}
