/// A federal agency and the GitHub organization it publishes under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agency {
    pub name: &'static str,
    pub org: &'static str,
}

const fn agency(name: &'static str, org: &'static str) -> Agency {
    Agency { name, org }
}

/// Agencies tracked by the activity run, in reporting order.
pub const FEDERAL_AGENCIES: &[Agency] = &[
    agency("United States Digital Service", "usds"),
    agency("General Services Administration", "18f"),
    agency("National Aeronautics and Space Administration", "nasa"),
    agency("Department of Defense", "deptofdefense"),
    agency("Department of Veterans Affairs", "department-of-veterans-affairs"),
    agency("Department of Health and Human Services", "hhs"),
    agency("Department of Energy", "DeptOfEnergy"),
    agency("Department of Justice", "usdoj"),
    agency("Department of Homeland Security", "dhs-gov"),
    agency("National Institute of Standards and Technology", "usnistgov"),
    agency("United States Geological Survey", "usgs"),
    agency("National Oceanic and Atmospheric Administration", "noaa-gsl"),
    agency("Centers for Disease Control and Prevention", "cdcepi"),
    agency("National Institutes of Health", "ncbi"),
    agency("Department of the Treasury", "US-Department-of-the-Treasury"),
    agency("Environmental Protection Agency", "usepa"),
    agency("Consumer Financial Protection Bureau", "cfpb"),
    agency("Federal Communications Commission", "fcc"),
    agency("National Park Service", "nationalparkservice"),
    agency("Department of State", "usstatedept"),
    agency("Department of Energy (Energy Apps)", "energyapps"),
    agency("Food and Drug Administration", "fda"),
    agency("Library of Congress", "libraryofcongress"),
    agency("White House", "whitehouse"),
    agency("Peace Corps", "peacecorps"),
    agency("Small Business Administration", "USSBA"),
    agency("Social Security Administration", "SSAgov"),
    agency("Federal Emergency Management Agency", "fema"),
    agency("United States Agency for International Development", "usaid"),
    agency("Internal Revenue Service", "IRSgov"),
    agency("United States Department of Agriculture", "usda"),
    agency("U.S. Citizenship and Immigration Services", "uscis"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_unique_orgs_and_names() {
        let orgs: HashSet<&str> = FEDERAL_AGENCIES.iter().map(|a| a.org).collect();
        let names: HashSet<&str> = FEDERAL_AGENCIES.iter().map(|a| a.name).collect();
        assert_eq!(orgs.len(), FEDERAL_AGENCIES.len());
        assert_eq!(names.len(), FEDERAL_AGENCIES.len());
    }
}
