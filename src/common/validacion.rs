// src/common/validacion.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Validación compartida por los payloads: volúmenes, piezas y tarifas
// nunca viajan en negativo.
pub fn validar_no_negativo(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rechaza_negativos_y_acepta_cero() {
        assert!(validar_no_negativo(&Decimal::from_str_exact("-0.01").unwrap()).is_err());
        assert!(validar_no_negativo(&Decimal::ZERO).is_ok());
        assert!(validar_no_negativo(&Decimal::from_str_exact("12.5").unwrap()).is_ok());
    }
}
