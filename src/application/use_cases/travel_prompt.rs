use crate::domain::TravelRequest;

pub(crate) const NO_INTERESTS: &str = "No specific interests";

/// Render the outbound prompt for `request`. Pure interpolation: the same
/// request always yields the same text.
pub fn build_prompt(request: &TravelRequest) -> String {
    let destination = request.destination();
    let currency = request.currency();
    let interests = if request.interests().is_empty() {
        NO_INTERESTS.to_string()
    } else {
        request.interests().join(", ")
    };

    format!(
        "Act as a travel planning AI. Create a detailed travel plan with the following structure and information:

Travel Details:
- Origin: {origin}
- Destination: {destination}
- Travel Dates: {start} to {end} ({days} days)
- Budget: {code} {budget}
- Number of Travelers: {travelers}
- Interests: {interests}
- Currency: {code}

Please provide the following sections in your response:

1. Itinerary: Create a day-by-day itinerary optimized for {destination}, considering the interests and budget.

2. Accommodations: Recommend suitable accommodations (hotels, rentals, etc.) within the budget. Be specific.

3. Transportation: Suggest the best transportation methods to, from, and within the destination.

4. Activities & Attractions: Recommend specific activities, attractions, and experiences that match the stated interests.

5. Budget Breakdown: Provide a detailed budget breakdown showing how the {symbol}{budget} should be allocated across accommodations, food, transportation, activities, etc.

6. Travel Tips: Share 3-5 important tips for this specific destination.

Format the response in a clean, organized manner with clear section headers. Make all recommendations specific to {destination} and tailored to the provided interests: {interests}.
",
        origin = request.origin(),
        destination = destination,
        start = request.start_date().format("%Y-%m-%d"),
        end = request.end_date().format("%Y-%m-%d"),
        days = request.trip_duration_days(),
        code = currency.code(),
        symbol = currency.symbol(),
        budget = request.budget(),
        travelers = request.travelers(),
        interests = interests,
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::TravelRequestDraft;

    fn request(interests: &[&str], currency: &str) -> TravelRequest {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        TravelRequestDraft::new("Mumbai", "Kyoto")
            .with_dates(
                NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
                NaiveDate::from_ymd_opt(2026, 5, 15).unwrap(),
            )
            .with_budget(2500.0)
            .with_travelers(3)
            .with_interests(interests.iter().copied())
            .with_currency(currency)
            .submit(today)
            .unwrap()
    }

    #[test]
    fn interpolates_trip_details() {
        let prompt = build_prompt(&request(&["Temples", "Food"], "USD"));

        assert!(prompt.contains("- Origin: Mumbai"));
        assert!(prompt.contains("- Destination: Kyoto"));
        assert!(prompt.contains("- Travel Dates: 2026-05-10 to 2026-05-15 (5 days)"));
        assert!(prompt.contains("- Budget: USD 2500"));
        assert!(prompt.contains("- Number of Travelers: 3"));
        assert!(prompt.contains("- Interests: Temples, Food"));
        assert!(prompt.contains("how the $2500 should be allocated"));
    }

    #[test]
    fn empty_interests_get_placeholder() {
        let prompt = build_prompt(&request(&[], "EUR"));
        assert!(prompt.contains("- Interests: No specific interests"));
        assert!(prompt.contains("how the €2500 should be allocated"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let r = request(&["Hiking"], "INR");
        assert_eq!(build_prompt(&r), build_prompt(&r));
    }
}
