// src/services/precios_service.rs

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PreciosRepository,
    models::precios::{CalculoPrecio, Cotizacion, PrecioBaseMadera},
};

/// Calcula el precio sugerido a partir de las dimensiones físicas.
///
/// Si cualquier dimensión es cero o está ausente, el resultado completo es
/// cero: es el caso degenerado definido, no un error. El redondeo es
/// mitad-lejos-de-cero sobre el entero escalado (multiplicar, redondear,
/// dividir) para que llamadas repetidas no acumulen deriva.
pub fn calcular_precio(
    grosor_pulgadas: Decimal,
    ancho_pulgadas: Decimal,
    largo_pies: Decimal,
    precio_base: Decimal,
    precio_base_mayoreo: Decimal,
) -> CalculoPrecio {
    if grosor_pulgadas.is_zero() || ancho_pulgadas.is_zero() || largo_pies.is_zero() {
        return CalculoPrecio::cero();
    }

    let pies_tablares = (grosor_pulgadas * ancho_pulgadas * largo_pies / Decimal::from(12))
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);

    let precio_menudeo = (pies_tablares * precio_base)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let precio_mayoreo = if precio_base_mayoreo > Decimal::ZERO {
        (pies_tablares * precio_base_mayoreo)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    CalculoPrecio {
        pies_tablares,
        precio_menudeo,
        precio_mayoreo,
    }
}

/// Especie: igualdad exacta sin mayúsculas (la resuelve el SQL).
/// Calidad: la almacenada debe contener la consultada, sin mayúsculas.
pub fn coincide_calidad(calidad_almacenada: &str, calidad_consultada: &str) -> bool {
    calidad_almacenada
        .to_lowercase()
        .contains(&calidad_consultada.to_lowercase())
}

#[derive(Clone)]
pub struct PreciosService {
    precios_repo: PreciosRepository,
}

impl PreciosService {
    pub fn new(precios_repo: PreciosRepository) -> Self {
        Self { precios_repo }
    }

    pub async fn crear_precio_base(
        &self,
        aserradero_id: Uuid,
        especie: &str,
        calidad: &str,
        precio_pie_tablar: Decimal,
        precio_pie_tablar_mayoreo: Option<Decimal>,
    ) -> Result<PrecioBaseMadera, AppError> {
        self.precios_repo
            .crear_precio_base(
                self.precios_repo.pool(),
                aserradero_id,
                especie,
                calidad,
                precio_pie_tablar,
                precio_pie_tablar_mayoreo,
            )
            .await
    }

    pub async fn actualizar_precio_base(
        &self,
        aserradero_id: Uuid,
        precio_id: i64,
        precio_pie_tablar: Decimal,
        precio_pie_tablar_mayoreo: Option<Decimal>,
    ) -> Result<PrecioBaseMadera, AppError> {
        self.precios_repo
            .actualizar_precio_base(
                self.precios_repo.pool(),
                aserradero_id,
                precio_id,
                precio_pie_tablar,
                precio_pie_tablar_mayoreo,
            )
            .await?
            .ok_or(AppError::NotFound("Precio base"))
    }

    pub async fn listar_precios_base(
        &self,
        aserradero_id: Uuid,
    ) -> Result<Vec<PrecioBaseMadera>, AppError> {
        self.precios_repo
            .listar_precios_base(self.precios_repo.pool(), aserradero_id)
            .await
    }

    /// Cotiza dimensiones contra la tarifa base del tenant. Si ninguna fila
    /// coincide, devuelve `encontrado = false` con precios en cero: es el
    /// resultado "sin cotización disponible", deliberadamente no un error.
    pub async fn cotizar(
        &self,
        aserradero_id: Uuid,
        especie: &str,
        calidad: &str,
        grosor_pulgadas: Decimal,
        ancho_pulgadas: Decimal,
        largo_pies: Decimal,
    ) -> Result<Cotizacion, AppError> {
        let candidatas = self
            .precios_repo
            .buscar_por_especie(self.precios_repo.pool(), aserradero_id, especie)
            .await?;

        let Some(base) = candidatas
            .iter()
            .find(|p| coincide_calidad(&p.calidad, calidad))
        else {
            return Ok(Cotizacion::sin_tarifa());
        };

        let calculo = calcular_precio(
            grosor_pulgadas,
            ancho_pulgadas,
            largo_pies,
            base.precio_pie_tablar,
            base.precio_pie_tablar_mayoreo.unwrap_or(Decimal::ZERO),
        );

        Ok(Cotizacion {
            encontrado: true,
            calculo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn ejemplo_canonico_dos_por_seis_por_ocho() {
        let r = calcular_precio(d("2"), d("6"), d("8"), d("10"), d("8"));
        assert_eq!(r.pies_tablares, d("8.0000"));
        assert_eq!(r.precio_menudeo, d("80.00"));
        assert_eq!(r.precio_mayoreo, d("64.00"));
    }

    #[test]
    fn dimension_en_cero_devuelve_todo_cero() {
        let r = calcular_precio(d("0"), d("6"), d("8"), d("10"), d("8"));
        assert_eq!(r, CalculoPrecio::cero());

        let r = calcular_precio(d("2"), d("6"), d("0"), d("10"), d("8"));
        assert_eq!(r, CalculoPrecio::cero());
    }

    #[test]
    fn sin_tarifa_de_mayoreo_el_mayoreo_es_cero() {
        let r = calcular_precio(d("2"), d("6"), d("8"), d("10"), d("0"));
        assert_eq!(r.precio_mayoreo, Decimal::ZERO);
        assert_eq!(r.precio_menudeo, d("80.00"));
    }

    #[test]
    fn el_calculo_es_determinista() {
        let a = calcular_precio(d("1.5"), d("7.25"), d("8.5"), d("12.35"), d("11.10"));
        let b = calcular_precio(d("1.5"), d("7.25"), d("8.5"), d("12.35"), d("11.10"));
        assert_eq!(a, b);
    }

    #[test]
    fn redondeo_mitad_lejos_de_cero() {
        // 1 * 1 * 1.5 / 12 = 0.125 pies tablares.
        // 0.125 * 10.04 = 1.2550: mitad exacta, debe subir a 1.26.
        let r = calcular_precio(d("1"), d("1"), d("1.5"), d("10.04"), d("0"));
        assert_eq!(r.precio_menudeo, d("1.26"));
    }

    #[test]
    fn calidad_coincide_por_subcadena_sin_mayusculas() {
        assert!(coincide_calidad("Primera Clase", "primera"));
        assert!(coincide_calidad("PRIMERA", "Primera"));
        assert!(!coincide_calidad("Segunda", "primera"));
    }
}
