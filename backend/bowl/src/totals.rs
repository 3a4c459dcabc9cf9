use crate::{catalog::Menu, nutrients::Nutrients, portions::PortionSelection};

/// Sums `value × portion` over the menu's ingredients.
///
/// Ingredients at zero are skipped outright, and selection entries for ingredients the menu
/// does not carry contribute nothing.
pub fn compute_totals(selection: &PortionSelection, menu: &Menu) -> Nutrients {
    let mut totals = Nutrients::default();

    for ingredient in menu.ingredients() {
        let portion = selection.get(&ingredient.id);
        if portion.is_zero() {
            continue;
        }

        totals.add_scaled(&ingredient.nutrients, portion.factor());
    }

    totals
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        catalog::{Catalog, Menu},
        nutrients::Nutrient,
        portions::Portion,
    };

    fn menu() -> Menu {
        let catalog = Catalog::from_slice(
            br#"{"menus": [{"id": "m", "name": "M", "categories": [
                {"id": "base", "label": "Base", "ingredients": [
                    {"id": "rice", "name": "Rice", "calories": 200, "fiber_g": 2, "sodium_mg": 10},
                    {"id": "quinoa", "name": "Quinoa", "calories": 220, "protein_g": 8}
                ]},
                {"id": "proteins", "label": "Proteins", "ingredients": [
                    {"id": "tofu", "name": "Tofu", "calories": 150, "protein_g": 14, "total_fat_g": 7.5}
                ]}
            ]}]}"#,
        )
        .unwrap();

        catalog.menus.into_iter().next().unwrap()
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(compute_totals(&PortionSelection::new(), &menu()), Nutrients::default());
    }

    #[test]
    fn test_weighted_sum() {
        let mut selection = PortionSelection::new();
        selection.set("rice", Portion::Double);
        selection.set("tofu", Portion::Half);

        let totals = compute_totals(&selection, &menu());

        assert_eq!(totals[Nutrient::Calories], 475.0);
        assert_eq!(totals[Nutrient::Protein], 7.0);
        assert_eq!(totals[Nutrient::TotalFat], 3.75);
        assert_eq!(totals[Nutrient::Sodium], 20.0);
        assert_eq!(totals[Nutrient::Fiber], 4.0);
    }

    #[test]
    fn test_zero_entry_is_noop() {
        let mut selection = PortionSelection::new();
        selection.set("quinoa", Portion::Single);
        let before = compute_totals(&selection, &menu());

        selection.set("rice", Portion::Zero);
        assert_eq!(compute_totals(&selection, &menu()), before);
    }

    #[test]
    fn test_foreign_ingredient_ignored() {
        let mut selection = PortionSelection::new();
        selection.set("carnitas", Portion::Double);

        assert_eq!(compute_totals(&selection, &menu()), Nutrients::default());
    }

    proptest! {
        #[test]
        fn test_totals_are_weighted_sum(portions in prop::collection::vec(0..4usize, 3)) {
            let menu = menu();
            let portions: Vec<Portion> = portions.into_iter().map(|i| Portion::ALL[i]).collect();

            let mut selection = PortionSelection::new();
            let mut expected = Nutrients::default();
            for (ingredient, portion) in menu.ingredients().zip(&portions) {
                selection.set(ingredient.id.clone(), *portion);
                for nutrient in Nutrient::ALL {
                    expected[nutrient] += ingredient.nutrients[nutrient] * portion.factor();
                }
            }

            prop_assert_eq!(compute_totals(&selection, &menu), expected);
        }

        #[test]
        fn test_zero_entries_never_count(
            portions in prop::collection::vec(0..4usize, 3),
            foreign in 0..4usize,
        ) {
            let menu = menu();
            let ids: Vec<String> = menu.ingredients().map(|ingredient| ingredient.id.clone()).collect();

            let nonzero: PortionSelection = ids
                .iter()
                .zip(&portions)
                .filter(|(_, i)| **i != 0)
                .map(|(id, i)| (id.clone(), Portion::ALL[*i]))
                .collect();

            let mut with_zeros = nonzero.clone();
            for (id, i) in ids.iter().zip(&portions) {
                if *i == 0 {
                    with_zeros.set(id.clone(), Portion::Zero);
                }
            }
            with_zeros.set("carnitas", Portion::ALL[foreign]);

            prop_assert_eq!(
                compute_totals(&with_zeros, &menu),
                compute_totals(&nonzero, &menu)
            );
        }
    }
}
